use clap::{App, AppSettings};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let matches = App::new("clearcoin")
        .about("Clearcoin transaction clearing CLI tools.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(clearcoin_lib::commands::epoch_command())
        .get_matches();

    if let Some(ref matches) = matches.subcommand_matches("epoch") {
        clearcoin_lib::commands::run_epoch_command(&matches)
    } else {
        panic!("Should report help.");
    }
}
