use std::collections::BTreeSet;

use crate::models::{JobIdentity, JobPosting};
use crate::state::filter_discoverable;

/// Narrows the deck by category and faculty. Both are case-insensitive
/// substring matches; the faculty filter also accepts a matching location.
#[derive(Debug, Clone, Default)]
pub struct DeckFilter {
    pub category: Option<String>,
    pub faculty: Option<String>,
}

impl DeckFilter {
    pub fn new(category: Option<String>, faculty: Option<String>) -> Self {
        Self { category, faculty }
    }

    pub fn accepts(&self, posting: &JobPosting) -> bool {
        let category_ok = match non_empty(&self.category) {
            Some(category) => posting.category.to_lowercase().contains(&category),
            None => true,
        };
        let faculty_ok = match non_empty(&self.faculty) {
            Some(faculty) => [&posting.faculty_hint, &posting.location]
                .into_iter()
                .filter(|field| !field.is_empty())
                .any(|field| field.to_lowercase().contains(&faculty)),
            None => true,
        };
        category_ok && faculty_ok
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

/// The swipeable sequence of postings for one refresh.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryDeck {
    cards: Vec<JobPosting>,
    cursor: usize,
    exhausted: bool,
}

impl DiscoveryDeck {
    pub fn build(
        postings: Vec<JobPosting>,
        hidden: &BTreeSet<JobIdentity>,
        filter: &DeckFilter,
    ) -> Self {
        let cards = filter_discoverable(postings, hidden)
            .into_iter()
            .filter(|posting| filter.accepts(posting))
            .collect::<Vec<_>>();
        let exhausted = cards.is_empty();
        Self {
            cards,
            cursor: 0,
            exhausted,
        }
    }

    pub fn current(&self) -> Option<&JobPosting> {
        if self.exhausted {
            return None;
        }
        self.cards.get(self.cursor)
    }

    /// Move past the current card without deciding on it.
    pub fn skip(&mut self) {
        if self.cursor + 1 < self.cards.len() {
            self.cursor += 1;
        } else {
            self.exhausted = true;
        }
    }

    /// Take the current card out of the deck once it was saved or dismissed.
    pub fn take_current(&mut self) -> Option<JobPosting> {
        if self.exhausted || self.cursor >= self.cards.len() {
            return None;
        }
        let card = self.cards.remove(self.cursor);
        if self.cards.is_empty() {
            self.exhausted = true;
        } else if self.cursor >= self.cards.len() {
            self.cursor = self.cards.len() - 1;
        }
        Some(card)
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[JobPosting] {
        &self.cards
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn listing() -> Vec<JobPosting> {
        let mut a = JobPosting::new("Acme", "Intern").with_job_id(1);
        a.category = "IT".to_owned();
        a.faculty_hint = "FER".to_owned();
        let mut b = JobPosting::new("Beta", "Analyst").with_job_id(2);
        b.category = "Finance".to_owned();
        b.location = "Zagreb".to_owned();
        let mut c = JobPosting::new("Gamma", "Designer");
        c.category = "Design, IT".to_owned();
        c.location = "Split".to_owned();
        vec![a, b, c]
    }

    #[test]
    fn test_build_skips_hidden_postings() {
        let hidden = BTreeSet::from([JobIdentity::from("id:2")]);
        let deck = DiscoveryDeck::build(listing(), &hidden, &DeckFilter::default());
        let roles = deck.cards().iter().map(|p| p.role.as_str()).collect::<Vec<_>>();
        assert_eq!(roles, vec!["Intern", "Designer"]);
    }

    #[test]
    fn test_filter_by_category_and_faculty() {
        let filter = DeckFilter::new(Some("it".to_owned()), None);
        let deck = DiscoveryDeck::build(listing(), &BTreeSet::new(), &filter);
        assert_eq!(deck.len(), 2);

        let filter = DeckFilter::new(None, Some("zagreb".to_owned()));
        let deck = DiscoveryDeck::build(listing(), &BTreeSet::new(), &filter);
        assert_eq!(deck.cards()[0].company_name, "Beta");

        let filter = DeckFilter::new(Some("IT".to_owned()), Some("fer".to_owned()));
        let deck = DiscoveryDeck::build(listing(), &BTreeSet::new(), &filter);
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.cards()[0].company_name, "Acme");
    }

    #[test]
    fn test_blank_filter_accepts_everything() {
        let filter = DeckFilter::new(Some("  ".to_owned()), Some(String::new()));
        let deck = DiscoveryDeck::build(listing(), &BTreeSet::new(), &filter);
        assert_eq!(deck.len(), 3);
    }

    #[test]
    fn test_skip_exhausts_after_last_card() {
        let mut deck = DiscoveryDeck::build(listing(), &BTreeSet::new(), &DeckFilter::default());
        deck.skip();
        deck.skip();
        assert_eq!(deck.current().map(|p| p.role.as_str()), Some("Designer"));
        deck.skip();
        assert!(deck.is_exhausted());
        assert!(deck.current().is_none());
    }

    #[test]
    fn test_take_current_clamps_cursor() {
        let mut deck = DiscoveryDeck::build(listing(), &BTreeSet::new(), &DeckFilter::default());
        deck.skip();
        deck.skip();
        let taken = deck.take_current().expect("deck should have a card");
        assert_eq!(taken.role, "Designer");
        assert_eq!(deck.current().map(|p| p.role.as_str()), Some("Analyst"));
        deck.take_current();
        deck.take_current();
        assert!(deck.is_exhausted());
        assert!(deck.take_current().is_none());
    }
}
