use anyhow::Result;
use sprig::cli::SprigCli;

fn main() {
    if let Err(e) = real_main() {
        eprintln!("sprig error: {:#}", e);
        std::process::exit(1);
    }
}

fn real_main() -> Result<()> {
    let cli = SprigCli::parse();
    cli.run()
}
