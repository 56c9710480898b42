use crate::bootstrap_config::{increment_for, Command, ConfigCommand, OrgCommand, StoreCommand};
use crate::config::{save_config, set_value};
use crate::TdcError;
use common::types::artefact::Artefact;
use common::types::config::Config;
use common::util::logging::run_with_spinner;
use data_harvester::fetch::Fetcher;
use data_harvester::org;
use data_harvester::providers::ProviderRegistry;
use std::path::Path;
use store::UnionStore;

pub(super) async fn run(command: Command, config: &mut Config, config_path: &Path) -> Result<(), TdcError> {
    match command {
        Command::Store(command) => store_command(command, config),
        Command::Config(command) => config_command(command, config, config_path),
        Command::Fetch { provider, url, force } => {
            let path = Fetcher::from_config(config).fetch(&provider, &url, force).await?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Org(command) => org_command(command, config),
    }
}

fn store_command(command: StoreCommand, config: &Config) -> Result<(), TdcError> {
    let store = UnionStore::new(config)?;

    match command {
        StoreCommand::Clone => {
            run_with_spinner("registry", "Cloning registry", || store.clone_registry())?;
        }
        StoreCommand::List { maintainer } => {
            for urn in store.list(&maintainer)? {
                println!("{urn}");
            }
        }
        StoreCommand::Show { urn } => match store.get(&urn) {
            Ok(artefact) => {
                for line in describe(&artefact) {
                    println!("{line}");
                }
            }
            Err(err) if err.is_not_found() => println!("No object {urn}"),
            Err(err) => return Err(err.into()),
        },
        StoreCommand::AddToRegistry { urn } => {
            let path = store.add_to_registry(&urn)?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

/// Lines printed by `tdc store show`: the artefact, then one line per item of an
/// item scheme.
fn describe(artefact: &Artefact) -> Vec<String> {
    match artefact {
        Artefact::Maintainable(ma) => {
            let mut lines = vec![ma.to_string()];
            if ma.class.is_item_scheme() {
                lines.extend(ma.items.iter().enumerate().map(|(i, item)| format!("{i:>3} {item}")));
            }
            lines
        }
        Artefact::DataSet(ds) => vec![format!(
            "<{} {}: {} observations>",
            ds.kind.class(),
            ds.urn().shorten(),
            ds.observations.len()
        )],
    }
}

fn config_command(command: ConfigCommand, config: &mut Config, config_path: &Path) -> Result<(), TdcError> {
    match command {
        ConfigCommand::Show => {
            println!("{}", serde_json::to_string_pretty(&*config).map_err(crate::config::ConfigError::from)?);
        }
        ConfigCommand::Set { key, value } => {
            set_value(config, &key, &value)?;
            save_config(config, config_path)?;
        }
    }

    Ok(())
}

fn org_command(command: OrgCommand, config: &Config) -> Result<(), TdcError> {
    let providers = ProviderRegistry::with_builtin();

    match command {
        OrgCommand::Refresh { increment } => {
            let store = UnionStore::new(config)?;
            let artefact = org::refresh(&store, &providers, increment_for(increment))?;
            println!("{}", artefact.urn());
        }
        OrgCommand::Providers => {
            for provider in providers.iter() {
                println!("{}", provider.id());
                for urn in provider.provides() {
                    println!("  {}", urn.shorten());
                }
            }
        }
    }

    Ok(())
}
