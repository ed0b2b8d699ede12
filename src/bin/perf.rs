use log::{error, info};
use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use structopt::StructOpt;

use std::{process, time};

use rbfix::{Color, Nodes, Tree};

/// Command line options.
#[derive(Clone, StructOpt)]
pub struct Opt {
    #[structopt(long = "seed")]
    seed: Option<u64>,

    #[structopt(long = "loads", default_value = "1000000")] // default 1M
    loads: usize,

    #[structopt(long = "demo")]
    demo: bool,

    #[structopt(long = "log-level", default_value = "warn")]
    log_level: LevelFilter,
}

fn main() {
    let opts = Opt::from_args();
    let mode = TerminalMode::Mixed;
    TermLogger::init(opts.log_level, Config::default(), mode, ColorChoice::Auto).ok();

    if opts.demo {
        do_demo();
    }

    let seed = opts.seed.unwrap_or_else(random);
    info!("perf seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index: Tree<u64> = Tree::new();

    let start = time::Instant::now();
    for _i in 0..opts.loads {
        index = index.insert(rng.gen::<u64>());
    }
    println!("loaded {} items in {:?}", opts.loads, start.elapsed());

    let start = time::Instant::now();
    match index.validate() {
        Ok(stats) => println!("validated {:?}, took {:?}", stats, start.elapsed()),
        Err(err) => {
            error!("validate failed seed:{} {}", seed, err);
            process::exit(1);
        }
    }

    let start = time::Instant::now();
    let clone = index.clone();
    println!("cloned {} items, took {:?}", clone.len(), start.elapsed());

    let start = time::Instant::now();
    let n = index.iter().count();
    println!("iterating {} items, took {:?}", n, start.elapsed());
}

// rotations on ((1B 2R (4B 3R .)) 5B (6B 7R (8R 9B .))), followed by
// insertion into an empty tree.
fn do_demo() {
    let mut nodes: Nodes<u32> = Nodes::new();
    let mut ids = vec![];
    for (key, color) in [
        (1, Color::Black),
        (2, Color::Red),
        (3, Color::Red),
        (4, Color::Black),
        (5, Color::Black),
        (6, Color::Black),
        (7, Color::Red),
        (8, Color::Red),
        (9, Color::Black),
    ]
    .iter()
    {
        ids.push(nodes.alloc(*key, *color));
    }
    let n = |key: usize| ids[key - 1];
    nodes.attach_both(n(5), Some(n(2)), Some(n(7)));
    nodes.attach_both(n(2), Some(n(1)), Some(n(4)));
    nodes.attach_both(n(7), Some(n(6)), Some(n(9)));
    nodes.attach_left(n(4), Some(n(3)));
    nodes.attach_left(n(9), Some(n(8)));

    let fixture = Tree::from_raw(nodes, Some(n(5)));
    println!("fixture      {}", fixture);

    // a clone is re-numbered, look nodes up by key.
    for key in [7, 5].iter() {
        let tree = fixture.clone();
        if let Some(x) = tree.find(key) {
            println!("rotate-left {} {}", key, tree.rotate_left(x));
        }
    }

    let mut tree = Tree::new();
    for key in [5, 2, 7, 1, 4, 6, 9].iter() {
        tree = tree.insert(*key);
        println!("insert {}     {}", key, tree);
    }
}
