use clap::{crate_description, crate_name, crate_version, App, AppSettings, Arg, SubCommand};
use pbo::{extract, info, list};
use tracing::Level;

fn main() -> anyhow::Result<()> {
    let arg_archive = Arg::with_name("archive")
        .help("Archive file")
        .short("a")
        .long("archive")
        .required(true)
        .takes_value(true)
        .value_name("FILE");

    let arg_basedir = Arg::with_name("basedir")
        .help("Directory to unpack to (defaults to '.')")
        .required(true)
        .value_name("DIR")
        .default_value(".");

    let matches = App::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("verbose")
                .help("Log every header record")
                .short("v")
                .long("verbose"),
        )
        .subcommand(
            SubCommand::with_name("extract")
                .about("Extract archive")
                .arg(&arg_archive)
                .arg(&arg_basedir),
        )
        .subcommand(
            SubCommand::with_name("info")
                .about("Show product entry and archive layout")
                .arg(&arg_archive),
        )
        .subcommand(
            SubCommand::with_name("list")
                .about("List archive")
                .arg(&arg_archive)
                .arg(
                    Arg::with_name("hash")
                        .help("Print the blake3 sum of each entry's stored data")
                        .long("hash"),
                ),
        )
        .get_matches();

    let level = if matches.is_present("verbose") {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Some(matches) = matches.subcommand_matches("extract") {
        extract(
            matches.value_of("archive").unwrap(),
            matches.value_of("basedir").unwrap(),
        )?;
    } else if let Some(matches) = matches.subcommand_matches("info") {
        info(matches.value_of("archive").unwrap())?;
    } else if let Some(matches) = matches.subcommand_matches("list") {
        list(
            matches.value_of("archive").unwrap(),
            matches.is_present("hash"),
        )?;
    }
    Ok(())
}
