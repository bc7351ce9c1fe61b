//! User command handlers.

use tabled::Tabled;

use crudboard_core::{CoreError, Editable, Entity, ListState, NewUser, RecordId, User};

use crate::cli::{SetArgs, UsersArgs, UsersCommand};
use crate::error::CliError;

use super::records::{self, Record};
use super::{Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct UserRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "City")]
    city: String,
}

impl Record for User {
    type Row = UserRow;

    fn row(&self, _list: &ListState<Self>) -> UserRow {
        UserRow {
            id: self.id.get(),
            name: self.name.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            company: self.company.name.clone(),
            city: self.address.city.clone(),
        }
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: UsersArgs) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List(list) => records::list::<User>(ctx, &list, None).await,

        UsersCommand::Get { id } => records::get::<User>(ctx, RecordId::new(id)).await,

        UsersCommand::Create {
            name,
            username,
            email,
            fields,
            from_file,
        } => {
            let base = match from_file {
                Some(path) => util::read_json_file::<NewUser>(&path)?,
                None => NewUser {
                    name: name.unwrap_or_default(),
                    username: username.unwrap_or_default(),
                    email: email.unwrap_or_default(),
                    ..NewUser::default()
                },
            };
            let draft = with_fields(base, fields)?;
            records::create::<User>(ctx, draft).await
        }

        UsersCommand::Update { id, fields } => {
            records::update::<User>(ctx, RecordId::new(id), fields).await
        }

        UsersCommand::Delete { id } => records::delete::<User>(ctx, RecordId::new(id)).await,
    }
}

/// Apply `--set` edits to a draft, using the same field paths as `update`.
fn with_fields(draft: NewUser, fields: SetArgs) -> Result<NewUser, CliError> {
    if fields.set.is_empty() {
        return Ok(draft);
    }
    let mut user = User::from_draft(RecordId::default(), draft);
    for (path, value) in fields.set {
        let field = User::parse_field(&path).map_err(CoreError::from)?;
        user.set_field(field, &value).map_err(CoreError::from)?;
    }
    Ok(user.to_draft())
}
