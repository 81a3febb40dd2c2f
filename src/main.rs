mod config;
mod controller;
mod engine;
mod error;
mod library;
mod mpris;
mod playlist;
mod runtime;
mod session;

#[cfg(test)]
mod testing;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::args().skip(1).any(|a| a == "--print-config") {
        print!("{}", config::Settings::default().to_toml()?);
        return Ok(());
    }
    runtime::run()
}
