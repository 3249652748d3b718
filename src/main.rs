//! `molsphere <structure.pdb> [options.toml]`: open a window showing every
//! atom of the structure as a sphere.

use std::path::Path;

use molsphere::{options::Options, Viewer};

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let mut args = std::env::args().skip(1);
    let Some(structure) = args.next() else {
        log::error!("Usage: molsphere <structure.pdb> [options.toml]");
        std::process::exit(1);
    };

    let options = match args.next() {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(options) => options,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };

    let result = Viewer::builder()
        .with_path(structure)
        .with_options(options)
        .build()
        .run();

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
