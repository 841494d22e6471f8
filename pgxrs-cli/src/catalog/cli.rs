use clap::{Command, arg};

pub const CATALOG_CMD: &str = "catalog";

pub fn create_catalog_cli() -> Command {
    Command::new(CATALOG_CMD)
        .about("Validate a catalog and print its panel and drugs.")
        .arg(arg!(--catalog <catalog> "Catalog file (.toml, .yaml), the embedded catalog if omitted"))
        .arg(arg!(--json "Print the summary as JSON"))
}
