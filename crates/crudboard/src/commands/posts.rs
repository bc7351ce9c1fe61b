//! Post command handlers.

use tabled::Tabled;

use crudboard_core::{ListState, NewPost, Post, RecordId};

use crate::cli::{PostsArgs, PostsCommand};
use crate::error::CliError;
use crate::output;

use super::records::{self, Record};
use super::{Context, util};

const TITLE_WIDTH: usize = 50;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct PostRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Title")]
    title: String,
}

impl Record for Post {
    type Row = PostRow;

    fn row(&self, list: &ListState<Self>) -> PostRow {
        PostRow {
            id: self.id.get(),
            author: list.author_name(self.user_id).to_owned(),
            title: output::truncate(&self.title, TITLE_WIDTH),
        }
    }

    fn label(&self) -> String {
        self.title.clone()
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: PostsArgs) -> Result<(), CliError> {
    match args.command {
        PostsCommand::List { list, user } => {
            records::list::<Post>(ctx, &list, user.map(RecordId::new)).await
        }

        PostsCommand::Get { id } => records::get::<Post>(ctx, RecordId::new(id)).await,

        PostsCommand::Create {
            user_id,
            title,
            body,
            from_file,
        } => {
            let draft = match from_file {
                Some(path) => util::read_json_file::<NewPost>(&path)?,
                None => NewPost {
                    user_id: RecordId::new(user_id.unwrap_or_default()),
                    title: title.unwrap_or_default(),
                    body: body.unwrap_or_default(),
                },
            };
            records::create::<Post>(ctx, draft).await
        }

        PostsCommand::Update { id, fields } => {
            records::update::<Post>(ctx, RecordId::new(id), fields).await
        }

        PostsCommand::Delete { id } => records::delete::<Post>(ctx, RecordId::new(id)).await,
    }
}
