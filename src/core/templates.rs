use crate::config::messages::TemplateCatalog;
use crate::core::{BodySelector, Message};
use crate::domain::identifiers::TemplateKey;
use rand::Rng;
use std::sync::Arc;

const FALLBACK_TITLE: &str = "Notification";
const FALLBACK_BODY: &str = "You have a new notification";

/// Picks bodies with the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomBodySelector;

impl BodySelector for RandomBodySelector {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Resolves task types to notification text.
pub struct TemplateProvider<R: BodySelector = RandomBodySelector> {
    catalog: Arc<TemplateCatalog>,
    selector: R,
}

impl TemplateProvider<RandomBodySelector> {
    pub fn new(catalog: Arc<TemplateCatalog>) -> Self {
        Self::with_selector(catalog, RandomBodySelector)
    }
}

impl<R: BodySelector> TemplateProvider<R> {
    pub fn with_selector(catalog: Arc<TemplateCatalog>, selector: R) -> Self {
        Self { catalog, selector }
    }

    pub fn catalog(&self) -> &Arc<TemplateCatalog> {
        &self.catalog
    }

    /// Configured title for `key`, or the default title for unknown keys.
    pub fn title(&self, key: impl Into<TemplateKey>) -> &str {
        &self.catalog.entry(key.into()).title
    }

    pub fn random_message(&self, key: impl Into<TemplateKey>) -> Message {
        let key = key.into();
        let entry = self.catalog.entry(key);

        // never borrow from another entry, the title must stay fixed per key
        if !entry.bodies.is_empty() {
            let index = self.selector.pick(entry.bodies.len());
            if let Some(body) = entry.bodies.get(index) {
                return Message {
                    title: entry.title.clone(),
                    body: body.clone(),
                };
            }
        }

        tracing::warn!("⚠️ No usable template body for {:?}, using fallback text", key);
        Message {
            title: FALLBACK_TITLE.to_string(),
            body: FALLBACK_BODY.to_string(),
        }
    }

    pub fn all_bodies(&self, key: impl Into<TemplateKey>) -> &[String] {
        &self.catalog.entry(key.into()).bodies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identifiers::TaskType;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Cycles through indices so selections are predictable.
    struct CyclingSelector(AtomicUsize);

    impl BodySelector for CyclingSelector {
        fn pick(&self, len: usize) -> usize {
            self.0.fetch_add(1, Ordering::SeqCst) % len
        }
    }

    struct FixedSelector(usize);

    impl BodySelector for FixedSelector {
        fn pick(&self, _len: usize) -> usize {
            self.0
        }
    }

    fn provider() -> TemplateProvider {
        TemplateProvider::new(TemplateCatalog::embedded().unwrap())
    }

    #[test]
    fn test_random_message_for_all_types() {
        let provider = provider();
        for task_type in TaskType::ALL {
            let message = provider.random_message(task_type);
            assert!(!message.title.is_empty());
            assert!(!message.body.is_empty());
            assert!(provider.all_bodies(task_type).contains(&message.body));
        }
    }

    #[test]
    fn test_title_is_fixed_across_calls() {
        let provider = provider();
        for task_type in TaskType::ALL {
            let expected = provider.title(task_type).to_string();
            for _ in 0..20 {
                assert_eq!(provider.random_message(task_type).title, expected);
            }
        }
    }

    #[test]
    fn test_body_selection_varies() {
        let provider = provider();
        let seen: HashSet<String> = (0..100)
            .map(|_| provider.random_message(TaskType::Short).body)
            .collect();
        assert!(seen.len() >= 2, "expected at least 2 bodies, got {}", seen.len());
    }

    #[test]
    fn test_injected_selector_is_deterministic() {
        let catalog = TemplateCatalog::embedded().unwrap();
        let provider = TemplateProvider::with_selector(catalog, CyclingSelector(AtomicUsize::new(0)));
        let bodies = provider.all_bodies(TaskType::Near).to_vec();

        assert_eq!(provider.random_message(TaskType::Near).body, bodies[0]);
        assert_eq!(provider.random_message(TaskType::Near).body, bodies[1]);
        assert_eq!(provider.random_message(TaskType::Near).body, bodies[2]);
    }

    #[test]
    fn test_unknown_type_uses_default() {
        let provider = provider();
        let key = TemplateKey::from_raw("urgent");
        assert_eq!(provider.title(key), "Reminder");

        let message = provider.random_message(key);
        assert_eq!(message.title, "Reminder");
        assert!(provider.all_bodies(key).contains(&message.body));
        assert_eq!(
            provider.all_bodies(key),
            provider.catalog().default_entry().bodies.as_slice()
        );
    }

    #[test]
    fn test_unknown_type_is_rejected_by_strict_parser() {
        let provider = provider();
        let raw = "urgent";
        assert_eq!(provider.title(TemplateKey::from_raw(raw)), "Reminder");
        assert!(raw.parse::<TaskType>().is_err());
    }

    #[test]
    fn test_out_of_range_selection_falls_back() {
        let catalog = TemplateCatalog::embedded().unwrap();
        let provider = TemplateProvider::with_selector(catalog, FixedSelector(usize::MAX));
        let message = provider.random_message(TaskType::Short);
        assert_eq!(message.title, FALLBACK_TITLE);
        assert_eq!(message.body, FALLBACK_BODY);
    }

    #[test]
    fn test_out_of_range_selection_does_not_borrow_default_entry() {
        let catalog = TemplateCatalog::from_toml_str(
            r#"
[default]
title = "Default"
bodies = ["d1", "d2", "d3"]

[types.short]
title = "Short"
bodies = ["s1"]

[types.near]
title = "Near"
bodies = ["n1"]

[types.relaxed]
title = "Relaxed"
bodies = ["r1"]

[types.scheduled]
title = "Scheduled"
bodies = ["c1"]
"#,
        )
        .unwrap();
        // index 2 exists in the default entry but not in short
        let provider = TemplateProvider::with_selector(Arc::new(catalog), FixedSelector(2));

        let message = provider.random_message(TaskType::Short);
        assert_ne!(message.title, "Default");
        assert_eq!(message.title, FALLBACK_TITLE);
        assert_eq!(message.body, FALLBACK_BODY);

        let message = provider.random_message(TemplateKey::Unknown);
        assert_eq!(message.title, "Default");
        assert_eq!(message.body, "d3");
    }
}
