//! `query` command: filter the article store and print JSON.

use anyhow::Result;

use crate::cli::args::QueryArgs;
use crate::config::NotesConfig;
use crate::store::ArticleStore;

pub fn query_articles(config: &NotesConfig, args: &QueryArgs) -> Result<()> {
    let store = ArticleStore::load(&config.data_path())?;

    let json = if args.categories {
        to_json(store.categories(), args.pretty)?
    } else {
        let hits = store.filter(args.category.as_deref(), args.search.as_deref());
        to_json(&hits, args.pretty)?
    };
    println!("{json}");
    Ok(())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}
