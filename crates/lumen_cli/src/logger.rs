use env_logger::{Builder, Env};
use log::LevelFilter;

/// Log targets of the binary and the lumen library crates.
const LUMEN_TARGETS: [&str; 4] = ["lumen", "lumen_core", "lumen_math", "lumen_renderer"];

/// Log lumen's own crates at `level` and everything else (rayon, image) at
/// warnings only.
fn configure(builder: &mut Builder, level: LevelFilter) {
    builder.filter_level(LevelFilter::Warn.min(level));
    for target in LUMEN_TARGETS {
        builder.filter_module(target, level);
    }
}

/// Install the global logger. `RUST_LOG` directives override the defaults.
pub fn init_logger(level: LevelFilter) {
    let mut builder = Builder::new();
    configure(&mut builder, level);
    builder.parse_env(Env::default()).init();
}
