use anyhow::Result;
use corpus_search::{CorpusSearch, SearchError};
use std::sync::Arc;
use std::time::Instant;

use crate::render;

pub const HELP: &str = "Commands:\n\
/search <terms>  search the corpus, AND terms with '|', e.g. City|Street|Number\n\
/limit <n>       set the number of lines returned per search\n\
/files           count corpus files\n\
/help            show this message\n\
/quit            exit";

/// One line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Search(String),
    Limit(String),
    Files,
    Help,
    Quit,
    Unknown(String),
}

impl ChatCommand {
    /// `None` for blank input.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (name, payload) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name {
            "/search" => Self::Search(payload.to_string()),
            "/limit" => Self::Limit(payload.to_string()),
            "/files" => Self::Files,
            "/help" | "/start" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        };
        Some(command)
    }
}

/// Replies produced by one command.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reply {
    pub messages: Vec<String>,
    pub quit: bool,
}

impl Reply {
    fn say(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
            quit: false,
        }
    }
}

/// Dispatches operator commands against a shared engine.
#[derive(Clone)]
pub struct CommandHandler {
    search: Arc<CorpusSearch>,
}

impl CommandHandler {
    pub fn new(search: Arc<CorpusSearch>) -> Self {
        Self { search }
    }

    pub fn search(&self) -> &Arc<CorpusSearch> {
        &self.search
    }

    pub async fn handle(&self, command: ChatCommand) -> Result<Reply> {
        match command {
            ChatCommand::Search(query) => self.handle_search(query).await,
            ChatCommand::Limit(raw) => Ok(self.handle_limit(&raw)),
            ChatCommand::Files => self.handle_files().await,
            ChatCommand::Help => Ok(Reply::say(HELP)),
            ChatCommand::Quit => Ok(Reply {
                messages: Vec::new(),
                quit: true,
            }),
            ChatCommand::Unknown(name) => {
                Ok(Reply::say(format!("Unknown command {name}. Try /help")))
            }
        }
    }

    async fn handle_search(&self, query: String) -> Result<Reply> {
        log::info!("Search request: {query:?}");
        let search = Arc::clone(&self.search);
        let started = Instant::now();
        let outcome = tokio::task::spawn_blocking(move || search.search(&query)).await?;

        match outcome {
            Ok(result) => {
                if result.tool_failed {
                    log::warn!("Search tool failed; reporting no results");
                }
                let config = self.search.config();
                Ok(Reply {
                    messages: render::search_messages(
                        &result,
                        config.root(),
                        config.max_count_per_file(),
                        started.elapsed(),
                    ),
                    quit: false,
                })
            }
            Err(SearchError::EmptyQuery) => Ok(Reply::say(render::NOTHING_TO_SEARCH)),
            Err(err) => Err(err.into()),
        }
    }

    fn handle_limit(&self, raw: &str) -> Reply {
        log::info!("Limit request: {raw:?}");
        match self.search.set_limit(raw) {
            Ok(limit) => Reply::say(format!("Search limit is {limit} now")),
            Err(err) => Reply::say(format!(
                "{err}. Search limit is still {}",
                self.search.limit()
            )),
        }
    }

    async fn handle_files(&self) -> Result<Reply> {
        let search = Arc::clone(&self.search);
        let files = tokio::task::spawn_blocking(move || search.list_files()).await?;
        match files {
            Ok(files) => Ok(Reply::say(format!("Found {} files", files.len()))),
            Err(err) => {
                log::error!("Catalog failed: {err}");
                Ok(Reply::say(format!("Failed to list files: {err}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpus_search::{QueryLimiter, SearchBackend, SearchConfig};
    use pretty_assertions::assert_eq;
    use std::path::Path;

    struct FixedBackend(&'static str);

    impl SearchBackend for FixedBackend {
        fn run_search(&self, _: &Path, _: &str, _: &str, _: usize) -> corpus_search::Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn handler(output: &'static str) -> CommandHandler {
        let config = SearchConfig::new("/corpus", "txt").unwrap();
        let limiter = Arc::new(QueryLimiter::new(config.default_limit()));
        let search = CorpusSearch::new(config, Arc::new(FixedBackend(output)), limiter);
        CommandHandler::new(Arc::new(search))
    }

    #[test]
    fn parses_commands_and_payloads() {
        assert_eq!(
            ChatCommand::parse("/search  Smith|Main St "),
            Some(ChatCommand::Search("Smith|Main St".to_string()))
        );
        assert_eq!(
            ChatCommand::parse("/limit 20"),
            Some(ChatCommand::Limit("20".to_string()))
        );
        assert_eq!(
            ChatCommand::parse("/search"),
            Some(ChatCommand::Search(String::new()))
        );
        assert_eq!(ChatCommand::parse("/files"), Some(ChatCommand::Files));
        assert_eq!(ChatCommand::parse("/quit"), Some(ChatCommand::Quit));
        assert_eq!(
            ChatCommand::parse("hello"),
            Some(ChatCommand::Unknown("hello".to_string()))
        );
        assert_eq!(ChatCommand::parse("   "), None);
    }

    #[tokio::test]
    async fn empty_search_says_nothing_to_search() {
        let reply = handler("").handle(ChatCommand::Search(String::new())).await.unwrap();
        assert_eq!(reply.messages, vec![render::NOTHING_TO_SEARCH.to_string()]);
    }

    #[tokio::test]
    async fn search_renders_blocks_and_summary() {
        let reply = handler("/corpus/berlin/p.txt:Alice Smith 42 Main St\n")
            .handle(ChatCommand::Search("smith".to_string()))
            .await
            .unwrap();
        assert_eq!(reply.messages.len(), 2);
        assert_eq!(reply.messages[0], "== berlin\n- Alice Smith 42 Main St");
        assert!(reply.messages[1].ends_with("output limit is 10"));
    }

    #[tokio::test]
    async fn invalid_limit_keeps_previous_value() {
        let handler = handler("");
        let reply = handler
            .handle(ChatCommand::Limit("lots".to_string()))
            .await
            .unwrap();
        assert!(reply.messages[0].ends_with("Search limit is still 10"));

        let reply = handler
            .handle(ChatCommand::Limit("3".to_string()))
            .await
            .unwrap();
        assert_eq!(reply.messages, vec!["Search limit is 3 now".to_string()]);
        assert_eq!(handler.search().limit(), 3);
    }

    #[tokio::test]
    async fn quit_stops_the_session() {
        let reply = handler("").handle(ChatCommand::Quit).await.unwrap();
        assert!(reply.quit);
        assert!(reply.messages.is_empty());
    }
}
