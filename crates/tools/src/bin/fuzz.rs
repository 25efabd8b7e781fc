use anyhow::{Result, bail};
use clap::Parser;
use mapbank_core::tiles::{ENTRANCE, Tile, VOID, WALL};
use mapbank_core::{GenerateError, LevelGenerator, LevelParams, RoguelikeGenerator, RoomParams};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    levels: u32,
}

fn between(rng: &mut ChaCha8Rng, min: usize, max: usize) -> usize {
    min + (rng.next_u64() as usize % (max - min + 1))
}

fn random_params(rng: &mut ChaCha8Rng) -> LevelParams {
    let side = between(rng, 6, 48);
    let min = between(rng, 1, 4);
    let max = between(rng, min, min + 12);
    LevelParams {
        width: side,
        height: between(rng, 6, 48),
        retry: between(rng, 0, 200) as u32,
        special: rng.next_u64() & 1 == 0,
        room: RoomParams {
            ideal: between(rng, 1, 15),
            min_width: min,
            max_width: max,
            min_height: min,
            max_height: max,
        },
    }
}

fn check_level(params: &LevelParams, world: &[Vec<Tile>], room_count: usize) -> Result<()> {
    if world.len() != params.height || world.iter().any(|row| row.len() != params.width) {
        bail!("grid is not {}x{}", params.width, params.height);
    }
    if room_count == 0 || room_count > params.room.ideal {
        bail!("room count {room_count} outside 1..={}", params.room.ideal);
    }
    let entrances = world.iter().flatten().filter(|&&tile| tile == ENTRANCE).count();
    if entrances != 1 {
        bail!("expected one entrance, found {entrances}");
    }
    for (y, row) in world.iter().enumerate() {
        for (x, &tile) in row.iter().enumerate() {
            if tile == VOID || tile == WALL {
                continue;
            }
            let on_edge = y == 0 || x == 0 || y + 1 == params.height || x + 1 == params.width;
            if on_edge || [world[y - 1][x], world[y + 1][x], row[x - 1], row[x + 1]].contains(&VOID)
            {
                bail!("open tile {tile} at ({y}, {x}) leaks into the void");
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting generator fuzz on seed {} for {} levels...", args.seed, args.levels);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut generator = RoguelikeGenerator::new(args.seed);

    let (mut generated, mut rejected, mut empty) = (0_u32, 0_u32, 0_u32);
    for index in 0..args.levels {
        let params = random_params(&mut rng);
        match generator.generate(&params) {
            Ok(level) => {
                if let Err(e) = check_level(&params, &level.world, level.room_count) {
                    bail!("Invariant failed on level {index} with {params:?}: {e}");
                }
                generated += 1;
            }
            Err(GenerateError::InvalidParams { .. }) => rejected += 1,
            Err(GenerateError::NoRoomsPlaced { .. }) => empty += 1,
        }
    }

    println!(
        "Fuzzing completed successfully: {generated} levels checked, {rejected} parameter sets \
         rejected, {empty} with no room placed."
    );
    Ok(())
}
