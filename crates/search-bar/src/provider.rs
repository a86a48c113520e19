//! In-memory command index built from item providers

use std::fmt::Debug;
use std::future::Future;

use crate::search::filter_items;
use crate::source::SearchSource;

/// An entry that can be found through a [`CommandIndex`]
///
/// Generic over `T`, the payload handed back when the entry is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchItem<T> {
    /// Display title, highlighted against the query (e.g., "Open File")
    pub title: String,

    /// Secondary line under the title (e.g., "Open a file from disk")
    pub subtitle: Option<String>,

    /// Group heading the entry is listed under (e.g., "File")
    pub group: Option<String>,

    /// Extra terms that should find this entry but are never displayed
    pub keywords: Vec<String>,

    /// Payload returned to the caller on selection
    pub value: T,
}

impl<T> SearchItem<T> {
    pub fn new(title: impl Into<String>, value: T) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            group: None,
            keywords: Vec::new(),
            value,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_keywords<I, K>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Get searchable text (title + subtitle + group + keywords)
    pub fn searchable_text(&self) -> String {
        let mut text = self.title.clone();
        for part in self
            .subtitle
            .iter()
            .chain(self.group.iter())
            .chain(self.keywords.iter())
        {
            text.push(' ');
            text.push_str(part);
        }
        text
    }
}

/// Supplies entries to a [`CommandIndex`]
pub trait ItemProvider<T>: Debug + Send + Sync {
    /// All entries this provider currently offers
    fn items(&self) -> Vec<SearchItem<T>>;

    /// Provider name for debugging
    fn name(&self) -> &str;
}

/// Registry of item providers, searchable as a whole
///
/// Providers are asked for their items on every search, so they may change
/// what they offer over time.
pub struct CommandIndex<T> {
    providers: Vec<Box<dyn ItemProvider<T>>>,
}

impl<T> CommandIndex<T> {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Register a provider; items are listed in registration order
    pub fn register(&mut self, provider: Box<dyn ItemProvider<T>>) {
        log::debug!("Registered item provider {}", provider.name());
        self.providers.push(provider);
    }

    pub fn all_items(&self) -> Vec<SearchItem<T>> {
        self.providers.iter().flat_map(|p| p.items()).collect()
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }
}

impl<T> Default for CommandIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for CommandIndex<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandIndex")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<T> SearchSource<SearchItem<T>> for CommandIndex<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn search(
        &self,
        query: String,
    ) -> impl Future<Output = anyhow::Result<Vec<SearchItem<T>>>> + Send {
        let ranked = filter_items(&self.all_items(), &query)
            .into_iter()
            .map(|(item, _score)| item)
            .collect();
        std::future::ready(Ok(ranked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Save,
        Quit,
    }

    #[derive(Debug)]
    struct TestProvider {
        can_save: bool,
    }

    impl ItemProvider<TestAction> for TestProvider {
        fn items(&self) -> Vec<SearchItem<TestAction>> {
            let mut items = vec![
                SearchItem::new("Quit", TestAction::Quit)
                    .with_subtitle("Exit the application")
                    .with_group("General"),
            ];

            if self.can_save {
                items.push(
                    SearchItem::new("Save", TestAction::Save)
                        .with_subtitle("Save the current file")
                        .with_group("File")
                        .with_keywords(["write", "persist"]),
                );
            }

            items
        }

        fn name(&self) -> &str {
            "TestProvider"
        }
    }

    #[test]
    fn test_register_providers() {
        let mut index: CommandIndex<TestAction> = CommandIndex::new();
        assert_eq!(index.provider_count(), 0);

        index.register(Box::new(TestProvider { can_save: false }));
        assert_eq!(index.provider_count(), 1);
        assert_eq!(index.all_items().len(), 1);
    }

    #[test]
    fn test_items_in_registration_order() {
        let mut index: CommandIndex<TestAction> = CommandIndex::new();
        index.register(Box::new(TestProvider { can_save: true }));
        index.register(Box::new(TestProvider { can_save: false }));

        let actions: Vec<_> = index.all_items().into_iter().map(|i| i.value).collect();
        assert_eq!(
            actions,
            vec![TestAction::Quit, TestAction::Save, TestAction::Quit]
        );
    }

    #[test]
    fn test_searchable_text() {
        let item = SearchItem::new("Save", TestAction::Save)
            .with_subtitle("Save the current file")
            .with_group("File")
            .with_keywords(["persist"]);

        assert_eq!(item.searchable_text(), "Save Save the current file File persist");
    }

    #[tokio::test]
    async fn test_index_is_a_search_source() {
        let mut index: CommandIndex<TestAction> = CommandIndex::new();
        index.register(Box::new(TestProvider { can_save: true }));

        let results = index.search("persist".to_string()).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].value, TestAction::Save);
    }
}
