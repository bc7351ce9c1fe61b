//! Handlers shared by `users` and `posts`: list, get, update, delete.
//!
//! Each runs one controller for the lifetime of the command. Lists go
//! through `ListController` so search, owner filter and paging behave
//! exactly as in an interactive view; single-record commands go through
//! `DetailController` and its edit buffer.

use serde::Serialize;
use strum::IntoEnumIterator;
use tabled::Tabled;

use crudboard_core::view::page_window;
use crudboard_core::{DetailController, Detailed, ListController, ListState, RecordId, Related};

use crate::cli::{ListArgs, OutputFormat, SetArgs};
use crate::error::CliError;
use crate::output;

use super::Context;
use super::util;

/// Page numbers shown in the list footer.
const PAGE_LINKS: usize = 5;

/// How a record type appears in CLI output.
pub trait Record: Detailed {
    type Row: Tabled;

    /// One table row; `list` supplies lookups such as author names.
    fn row(&self, list: &ListState<Self>) -> Self::Row;

    /// Short human label for prompts ("Leanne Graham", a post title).
    fn label(&self) -> String;
}

/// Entity plus related records, as printed by `get`.
#[derive(Serialize)]
struct DetailView<'a, E> {
    #[serde(flatten)]
    entity: &'a E,
    related: Option<&'a Related>,
}

// ── List ─────────────────────────────────────────────────────────────

pub async fn list<E: Record>(
    ctx: &Context,
    args: &ListArgs,
    owner: Option<RecordId>,
) -> Result<(), CliError> {
    let list = ListController::<E>::new(ctx.client.clone(), ctx.config.page_size_for(E::RESOURCE));
    list.load().await?;

    if let Some(ref term) = args.search {
        list.set_search_term(term.as_str());
    }
    list.set_filter(owner);
    if !args.all {
        list.set_page(args.page);
    }

    let out = list.with_state(|s| {
        let rows = if args.all { s.filtered() } else { s.page_rows() };
        let entities: Vec<&E> = rows.into_iter().filter_map(|r| r.entity()).collect();
        output::render_list(ctx.output, &entities, |e| e.row(s), |e| e.id().to_string())
    })?;
    output::print_output(&out, ctx.quiet);

    if ctx.output == OutputFormat::Table {
        let footer = list.with_state(|s| footer(s, args.all));
        output::status(&footer, ctx.quiet);
    }
    list.close();
    Ok(())
}

fn footer<E: Record>(state: &ListState<E>, all: bool) -> String {
    let info = state.page_info();
    if info.total_items == 0 {
        return format!("No {} match.", E::RESOURCE);
    }
    if all {
        return format!("{} {}", info.total_items, E::RESOURCE);
    }
    let pages: Vec<String> = page_window(info.page, info.total_pages, PAGE_LINKS)
        .into_iter()
        .map(|p| if p == info.page { format!("[{p}]") } else { p.to_string() })
        .collect();
    format!(
        "Showing {} to {} of {} {}  (page {})",
        info.first_item,
        info.last_item,
        info.total_items,
        E::RESOURCE,
        pages.join(" ")
    )
}

// ── Get ──────────────────────────────────────────────────────────────

pub async fn get<E: Record>(ctx: &Context, id: RecordId) -> Result<(), CliError> {
    let detail = DetailController::<E>::new(ctx.client.clone());
    let entity = detail
        .load(id)
        .await
        .map_err(util::record_error(E::RESOURCE, id))?;
    let related = detail.related();

    let view = DetailView {
        entity: &entity,
        related: related.as_ref(),
    };
    let out = output::render_single(
        ctx.output,
        &view,
        |v| {
            let mut text = describe(v.entity);
            if let Some(related) = v.related {
                text.push_str("\n\n");
                text.push_str(&describe_related(related));
            }
            text
        },
        |v| v.entity.id().to_string(),
    )?;
    output::print_output(&out, ctx.quiet);
    detail.close();
    Ok(())
}

// ── Update ───────────────────────────────────────────────────────────

/// Load `id`, apply every `--set` edit to the edit buffer, then save.
pub async fn update<E: Record>(
    ctx: &Context,
    id: RecordId,
    fields: SetArgs,
) -> Result<(), CliError> {
    if fields.set.is_empty() {
        return Err(CliError::Validation {
            field: "--set".into(),
            reason: format!(
                "nothing to update; expected one of: {}",
                field_names::<E>().join(", ")
            ),
        });
    }

    let detail = DetailController::<E>::new(ctx.client.clone());
    let on_error = util::record_error(E::RESOURCE, id);
    detail.load(id).await.map_err(&on_error)?;

    detail.begin_edit()?;
    for (path, value) in fields.set {
        detail.update_field_path(&path, &value)?;
    }
    let saved = detail.save_edit().await.map_err(&on_error)?;

    let out = output::render_single(ctx.output, &saved, describe::<E>, |e| {
        e.id().to_string()
    })?;
    output::print_output(&out, ctx.quiet);
    output::status(&format!("Updated {} {id}", E::RESOURCE.singular()), ctx.quiet);
    detail.close();
    Ok(())
}

// ── Delete ───────────────────────────────────────────────────────────

pub async fn delete<E: Record>(ctx: &Context, id: RecordId) -> Result<(), CliError> {
    let detail = DetailController::<E>::new(ctx.client.clone());
    let on_error = util::record_error(E::RESOURCE, id);
    let entity = detail.load(id).await.map_err(&on_error)?;

    let prompt = format!(
        "Delete {} {id} '{}'?",
        E::RESOURCE.singular(),
        output::truncate(&entity.label(), 40)
    );
    if !util::confirm(&prompt, ctx.yes)? {
        output::status("Aborted", ctx.quiet);
        return Ok(());
    }

    detail.remove().await.map_err(&on_error)?;
    output::status(&format!("Deleted {} {id}", E::RESOURCE.singular()), ctx.quiet);
    detail.close();
    Ok(())
}

// ── Create ───────────────────────────────────────────────────────────

/// Send `draft` through a list controller and print the confirmed record.
pub async fn create<E: Record>(ctx: &Context, draft: E::Draft) -> Result<(), CliError> {
    let list = ListController::<E>::new(ctx.client.clone(), ctx.config.page_size_for(E::RESOURCE));
    let created = list.create(draft).await?;

    let out = output::render_single(ctx.output, &created, describe::<E>, |e| {
        e.id().to_string()
    })?;
    output::print_output(&out, ctx.quiet);
    output::status(
        &format!("Created {} {}", E::RESOURCE.singular(), created.id()),
        ctx.quiet,
    );
    list.close();
    Ok(())
}

// ── Detail text ──────────────────────────────────────────────────────

/// Key/value block of every editable field, labelled by its `--set` path.
pub fn describe<E: Record>(entity: &E) -> String {
    let fields: Vec<E::Field> = <E::Field as IntoEnumIterator>::iter().collect();
    let width = fields
        .iter()
        .map(|f| f.to_string().len())
        .max()
        .unwrap_or(0)
        .max(2);

    let mut lines = vec![format!("{:<width$}  {}", "id", entity.id())];
    lines.extend(
        fields
            .into_iter()
            .map(|f| format!("{:<width$}  {}", f.to_string(), entity.field_value(f))),
    );
    lines.join("\n")
}

fn field_names<E: Record>() -> Vec<String> {
    <E::Field as IntoEnumIterator>::iter().map(|f| f.to_string()).collect()
}

fn describe_related(related: &Related) -> String {
    match related {
        Related::UserPosts { posts } => {
            let mut lines = vec![format!("Posts ({})", posts.len())];
            lines.extend(posts.iter().map(|p| format!("  {:>4}  {}", p.id, p.title)));
            lines.join("\n")
        }
        Related::PostContext {
            author,
            more_from_author,
        } => {
            let mut lines = vec![match author {
                Some(user) => format!("Author: {} (@{}, id {})", user.name, user.username, user.id),
                None => format!("Author: {}", crudboard_core::list::UNKNOWN_AUTHOR),
            }];
            if !more_from_author.is_empty() {
                lines.push("More from this author".into());
                lines.extend(
                    more_from_author
                        .iter()
                        .map(|p| format!("  {:>4}  {}", p.id, p.title)),
                );
            }
            lines.join("\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudboard_core::{NewPost, Post};

    #[test]
    fn describe_lists_set_paths() {
        let post = Post::from_draft(
            RecordId::new(4),
            NewPost {
                user_id: RecordId::new(2),
                title: "Hello".into(),
                body: "World".into(),
            },
        );
        let text = describe(&post);
        assert!(text.starts_with("id"));
        assert!(text.contains("title"));
        assert!(text.contains("userId  2"));
    }

    #[test]
    fn related_without_author_uses_placeholder() {
        let text = describe_related(&Related::PostContext {
            author: None,
            more_from_author: Vec::new(),
        });
        assert_eq!(text, "Author: Unknown User");
    }
}
