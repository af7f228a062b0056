use clap::Subcommand;
use zuk_timer_core::{FileStore, Preferences};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a preference value
    Get {
        /// Preference name (show_hints, recolor_on_stage, theme_mode)
        key: String,
    },
    /// Set a preference value
    Set {
        /// Preference name
        key: String,
        /// New value (true/false, or dark/light/device for theme_mode)
        value: String,
    },
    /// List all preferences as JSON
    List,
    /// Reset preferences to defaults
    Reset,
    /// Print the location of the preference file
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = FileStore::open()?;
    match action {
        ConfigAction::Get { key } => {
            let prefs = Preferences::load(&store);
            match prefs.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut prefs = Preferences::load(&store);
            prefs.set(&mut store, &key, &value)?;
            println!("ok");
        }
        ConfigAction::List => {
            let prefs = Preferences::load(&store);
            println!("{}", serde_json::to_string_pretty(&prefs)?);
        }
        ConfigAction::Reset => {
            Preferences::default().save(&mut store)?;
            println!("preferences reset to defaults");
        }
        ConfigAction::Path => println!("{}", store.path().display()),
    }
    Ok(())
}
