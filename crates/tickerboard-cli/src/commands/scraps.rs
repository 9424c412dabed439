use tickerboard_warehouse::{
    FileSession, NewScrap, ScrapStore, UserId, Warehouse, WarehouseConfig,
};
use uuid::Uuid;

use crate::cli::{ScrapsArgs, ScrapsCommand};
use crate::error::CliError;
use crate::output;

use super::session::require_user;

pub fn run(
    args: &ScrapsArgs,
    config: &WarehouseConfig,
    session: &FileSession,
    pretty: bool,
) -> Result<(), CliError> {
    let user = require_user(session)?;
    let warehouse = Warehouse::open(config.clone())?;
    execute(&args.command, &warehouse, &user, pretty)
}

fn execute(
    command: &ScrapsCommand,
    store: &impl ScrapStore,
    user: &UserId,
    pretty: bool,
) -> Result<(), CliError> {
    match command {
        ScrapsCommand::List => output::render(&store.list_scraps(user)?, pretty),
        ScrapsCommand::Add(args) => {
            let mut scrap = NewScrap::new(args.content_type.into(), args.content_id.as_str())?;
            if let Some(note) = &args.note {
                scrap = scrap.with_notes(note.as_str())?;
            }
            output::render(&store.insert_scrap(user, scrap)?, pretty)
        }
        ScrapsCommand::Remove(args) => {
            let id = Uuid::parse_str(args.id.trim())
                .map_err(|e| CliError::Command(format!("invalid scrap id '{}': {e}", args.id)))?;
            if !store.delete_scrap(user, id)? {
                return Err(CliError::Command(format!("no scrap with id {id}")));
            }
            output::render(&serde_json::json!({ "deleted": id }), pretty)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ContentTypeArg, ScrapAddArgs, ScrapRemoveArgs};
    use tempfile::tempdir;

    #[test]
    fn remove_of_unknown_id_is_a_command_error() {
        let temp = tempdir().expect("tempdir");
        let warehouse = Warehouse::open(WarehouseConfig::under(temp.path())).expect("open");
        let user = UserId::parse("alice").expect("valid");

        let err = execute(
            &ScrapsCommand::Remove(ScrapRemoveArgs {
                id: Uuid::new_v4().to_string(),
            }),
            &warehouse,
            &user,
            false,
        )
        .expect_err("must fail");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn add_then_list_round_trips_through_the_store() {
        let temp = tempdir().expect("tempdir");
        let warehouse = Warehouse::open(WarehouseConfig::under(temp.path())).expect("open");
        let user = UserId::parse("alice").expect("valid");

        execute(
            &ScrapsCommand::Add(ScrapAddArgs {
                content_type: ContentTypeArg::Indicator,
                content_id: String::from("VIX"),
                note: Some(String::from("volatility spike")),
            }),
            &warehouse,
            &user,
            false,
        )
        .expect("add");

        let scraps = warehouse.list_scraps(&user).expect("list");
        assert_eq!(scraps.len(), 1);
        assert_eq!(scraps[0].notes.as_deref(), Some("volatility spike"));
    }

    #[test]
    fn scraps_require_a_session() {
        let temp = tempdir().expect("tempdir");
        let config = WarehouseConfig::under(temp.path());
        let session = FileSession::new(config.session_path());

        let err = run(
            &ScrapsArgs {
                command: ScrapsCommand::List,
            },
            &config,
            &session,
            false,
        )
        .expect_err("must fail");
        assert!(matches!(err, CliError::NotSignedIn));
    }
}
