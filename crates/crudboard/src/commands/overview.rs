//! Overview handler: counts, recent posts and featured users.

use tabled::Tabled;

use crudboard_core::list::UNKNOWN_AUTHOR;
use crudboard_core::{Overview, Post, User};

use crate::error::CliError;
use crate::output;

use super::Context;

const TITLE_WIDTH: usize = 50;

#[derive(Tabled)]
struct RecentRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    author: String,
}

#[derive(Tabled)]
struct FeaturedRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Posts")]
    posts: usize,
}

fn recent_row(overview: &Overview, post: &Post) -> RecentRow {
    RecentRow {
        id: post.id.get(),
        title: output::truncate(&post.title, TITLE_WIDTH),
        author: overview
            .author_of(post)
            .map_or(UNKNOWN_AUTHOR, |u| u.name.as_str())
            .to_owned(),
    }
}

fn featured_row(overview: &Overview, user: &User) -> FeaturedRow {
    FeaturedRow {
        id: user.id.get(),
        name: user.name.clone(),
        company: user.company.name.clone(),
        posts: overview.posts_by(user.id),
    }
}

fn summary(overview: &Overview) -> String {
    let recent: Vec<RecentRow> = overview
        .recent_posts
        .iter()
        .map(|p| recent_row(overview, p))
        .collect();
    let featured: Vec<FeaturedRow> = overview
        .featured_users
        .iter()
        .map(|u| featured_row(overview, u))
        .collect();

    [
        format!("Users: {}", overview.user_count),
        format!("Posts: {}", overview.post_count),
        String::new(),
        "Recent posts".into(),
        output::render_table(&recent),
        String::new(),
        "Featured users".into(),
        output::render_table(&featured),
    ]
    .join("\n")
}

pub async fn handle(ctx: &Context) -> Result<(), CliError> {
    let overview = Overview::load(&ctx.client).await?;
    let out = output::render_single(ctx.output, &overview, summary, |o| {
        format!("{} {}", o.user_count, o.post_count)
    })?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudboard_core::{Catalog, NewPost, NewUser, RecordId};

    #[test]
    fn summary_shows_counts_and_authors() {
        let mut author = User::from_draft(RecordId::new(1), NewUser::default());
        author.name = "Ada".into();
        let catalog = Catalog {
            users: vec![author],
            posts: vec![
                Post::from_draft(
                    RecordId::new(1),
                    NewPost {
                        user_id: RecordId::new(1),
                        title: "first".into(),
                        body: String::new(),
                    },
                ),
                Post::from_draft(
                    RecordId::new(2),
                    NewPost {
                        user_id: RecordId::new(99),
                        title: "orphan".into(),
                        body: String::new(),
                    },
                ),
            ],
        };
        let text = summary(&Overview::from_catalog(&catalog));
        assert!(text.contains("Users: 1"));
        assert!(text.contains("Posts: 2"));
        assert!(text.contains("Ada"));
        assert!(text.contains(UNKNOWN_AUTHOR));
    }
}
