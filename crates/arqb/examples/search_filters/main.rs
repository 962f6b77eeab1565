//! Example: build a filtered listing query and hand it to an executor.
//!
//! Run with:
//!   cargo run --example search_filters -p arqb
//!
//! The executor here only prints the compiled request as JSON.

use arqb::{Executor, Model, QbResult, QueryBuilder, Request, op};

struct Article;

impl Model for Article {
    const NAME: &'static str = "blog::Article";
}

#[derive(Debug)]
struct Filters {
    search: Option<String>,
    statuses: Vec<String>,
    min_comments: Option<i64>,
    author_ids: Vec<i64>,
    page: u64,
    per_page: u64,
}

fn build_query(filters: &Filters) -> QbResult<QueryBuilder> {
    let mut qb = QueryBuilder::for_model_aliased::<Article>("a");
    qb.select(["COUNT(c.id) AS comment_count"])
        .left_join("comments c", Some("c.article_id = a.id".into()))?
        .and_where(op::neq("a.published_at", None::<&str>))
        .group_by(["a.id"])
        .order_by_desc("a.published_at");

    if let Some(search) = &filters.search {
        qb.and_where(arqb::or![
            op::like("a.title", search.as_str()),
            op::like("a.body", search.as_str()),
        ]);
    }
    if !filters.statuses.is_empty() {
        qb.and_where(op::in_list("a.status", filters.statuses.iter().cloned())?);
    }
    for author_id in &filters.author_ids {
        qb.or_where(op::eq("a.author_id", *author_id));
    }
    if let Some(min) = filters.min_comments {
        qb.having(op::gte("comment_count", min)?)?;
    }

    qb.limit(filters.per_page)
        .offset(filters.page.saturating_sub(1) * filters.per_page);
    Ok(qb)
}

struct PrintExecutor;

impl PrintExecutor {
    fn print(&self, operation: &str, model: &str, request: &Request) -> QbResult<()> {
        println!("{operation} {model}");
        println!("{:#}", request.to_json()?);
        Ok(())
    }
}

impl Executor for PrintExecutor {
    type Record = ();

    async fn all(&self, model: &str, request: &Request) -> QbResult<Vec<()>> {
        self.print("all", model, request)?;
        Ok(Vec::new())
    }

    async fn first(&self, model: &str, request: &Request) -> QbResult<Option<()>> {
        self.print("first", model, request)?;
        Ok(None)
    }

    async fn last(&self, model: &str, request: &Request) -> QbResult<Option<()>> {
        self.print("last", model, request)?;
        Ok(None)
    }

    async fn count(&self, model: &str, request: &Request) -> QbResult<u64> {
        self.print("count", model, request)?;
        Ok(0)
    }

    async fn delete_all(&self, model: &str, request: &Request) -> QbResult<u64> {
        self.print("delete_all", model, request)?;
        Ok(0)
    }

    async fn update_all(&self, model: &str, request: &Request) -> QbResult<u64> {
        self.print("update_all", model, request)?;
        Ok(0)
    }
}

#[tokio::main]
async fn main() -> QbResult<()> {
    let filters = Filters {
        search: Some("rust".into()),
        statuses: vec!["published".into(), "featured".into()],
        min_comments: Some(3),
        author_ids: vec![7, 11],
        page: 2,
        per_page: 20,
    };

    let qb = build_query(&filters)?;
    qb.all(&PrintExecutor).await?;

    // Bulk paths only accept conditions, order and limit.
    let mut stale = QueryBuilder::for_model::<Article>();
    stale
        .and_where(op::lt("updated_at", "2020-01-01")?)
        .order_by_asc("updated_at")
        .limit(500);
    stale
        .update_all(&PrintExecutor, [("status", "archived")])
        .await?;

    if let Err(e) = qb.delete_all(&PrintExecutor).await {
        println!("rejected: {e}");
    }

    Ok(())
}
