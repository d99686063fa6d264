mod cli;
mod config;
mod error;
mod lister;
mod logging;
mod runner;
mod scaffold;
mod section;
mod templates;
mod toc;

fn main() -> anyhow::Result<()> {
    let app = cli::parse();
    logging::init(app.verbose);
    runner::run(app)
}
