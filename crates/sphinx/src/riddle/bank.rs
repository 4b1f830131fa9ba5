//! The static trivia catalog.

use anyhow::{Result, bail};
use rand::Rng;
use sphinx_common::{RiddleEntry, normalize_answer};

use super::CategoryCycler;

/// Built-in rotation order
const CATEGORIES: &[&str] = &[
    "dsa",
    "operating-systems",
    "networks",
    "dbms",
    "mathematics",
    "machine-learning",
    "logic",
    "general",
];

/// Built-in entries: (category, question, answer)
const RIDDLES: &[(&str, &str, &str)] = &[
    ("dsa", "What is the time complexity of binary search on a sorted array?", "log n"),
    ("dsa", "What data structure uses LIFO ordering?", "stack"),
    ("dsa", "Which traversal visits root-left-right on a binary tree?", "preorder"),
    ("dsa", "What is the average time complexity of quicksort?", "n log n"),
    ("dsa", "Which data structure supports O(1) average time for insert and lookup?", "hash table"),
    ("operating-systems", "Which component translates virtual addresses to physical addresses?", "mmu"),
    ("operating-systems", "What scheduling algorithm assigns the CPU to the shortest next job?", "sjf"),
    ("operating-systems", "Which synchronization primitive can be used for mutual exclusion?", "mutex"),
    ("networks", "What does TCP stand for?", "transmission control protocol"),
    ("networks", "Which protocol hands out IP addresses automatically?", "dhcp"),
    ("networks", "Which layer in the OSI model handles routing between networks?", "network"),
    ("dbms", "Which SQL command removes a table and its data?", "drop table"),
    ("dbms", "Which normal form eliminates repeating groups and makes a primary key?", "first normal form"),
    ("dbms", "What kind of index allows fast lookup by a key?", "b tree"),
    ("mathematics", "What is the derivative of x^2?", "2x"),
    ("mathematics", "What is the value of pi (approx) to two decimal places?", "3.14"),
    ("mathematics", "What is 7 factorial (7!)?", "5040"),
    ("machine-learning", "Which algorithm is a large-margin classifier often used for classification?", "svm"),
    ("machine-learning", "What measure is used to evaluate binary classification (area under ROC)?", "auc"),
    ("machine-learning", "Which optimization method uses gradients to update parameters?", "gradient descent"),
    ("logic", "If 5 machines take 5 minutes to make 5 widgets, how long does 1 machine take to make 1 widget (minutes)?", "5"),
    ("logic", "I am an odd number. Take away one letter and I become even. What number am I?", "seven"),
    ("logic", "Find the next number in sequence: 2, 4, 8, 16, ?", "32"),
    ("general", "What is 2 + 2?", "4"),
    ("general", "What is the reverse of \"abc\"?", "cba"),
];

/// Immutable catalog of riddles grouped into an ordered set of categories.
///
/// Every bank holds at least one category and at least one entry. A
/// category may have an empty pool; picking from it falls back to the
/// whole bank.
#[derive(Debug, Clone)]
pub struct RiddleBank {
    categories: Vec<String>,
    entries: Vec<RiddleEntry>,
    /// Entry indices per category, parallel to `categories`
    pools: Vec<Vec<usize>>,
}

impl RiddleBank {
    /// The bank shipped with the site
    pub fn builtin() -> Self {
        let entries = RIDDLES
            .iter()
            .map(|(category, question, answer)| RiddleEntry::new(category, question, answer))
            .collect();
        let categories = CATEGORIES.iter().map(|c| c.to_string()).collect();

        Self::index(categories, entries)
    }

    /// Build a bank from arbitrary entries and an explicit rotation order.
    ///
    /// Answers are normalized on the way in. Entries whose category is not
    /// in `categories` are still reachable through the whole-bank fallback.
    pub fn from_entries(categories: Vec<String>, entries: Vec<RiddleEntry>) -> Result<Self> {
        if categories.is_empty() {
            bail!("Riddle bank needs at least one category");
        }
        if entries.is_empty() {
            bail!("Riddle bank needs at least one entry");
        }
        Ok(Self::index(categories, entries))
    }

    fn index(categories: Vec<String>, entries: Vec<RiddleEntry>) -> Self {
        let entries: Vec<RiddleEntry> = entries
            .into_iter()
            .map(|mut e| {
                e.answer = normalize_answer(&e.answer);
                e
            })
            .collect();

        let pools = categories
            .iter()
            .map(|category| {
                entries
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| &e.category == category)
                    .map(|(i, _)| i)
                    .collect()
            })
            .collect();

        Self {
            categories,
            entries,
            pools,
        }
    }

    /// Category names in rotation order
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Rotation over this bank's categories
    pub fn cycler(&self) -> CategoryCycler<'_> {
        CategoryCycler::new(&self.categories)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Uniform pick from `category`'s pool, or from the whole bank when
    /// that pool is empty or the category is unknown.
    pub fn pick<R: Rng>(&self, category: &str, rng: &mut R) -> &RiddleEntry {
        let pool = self
            .categories
            .iter()
            .position(|c| c == category)
            .and_then(|i| self.pools.get(i))
            .filter(|pool| !pool.is_empty());

        match pool {
            Some(pool) => &self.entries[pool[rng.random_range(0..pool.len())]],
            None => {
                tracing::debug!(category = %category, "Empty category pool, picking from whole bank");
                &self.entries[rng.random_range(0..self.entries.len())]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_builtin_pools_are_non_empty() {
        let bank = RiddleBank::builtin();
        assert_eq!(bank.categories().len(), 8);
        assert_eq!(bank.len(), RIDDLES.len());
        for pool in &bank.pools {
            assert!(!pool.is_empty());
        }
    }

    #[test]
    fn test_pick_stays_in_category() {
        let bank = RiddleBank::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(bank.pick("dbms", &mut rng).category, "dbms");
        }
    }

    #[test]
    fn test_pick_falls_back_on_empty_pool() {
        let bank = RiddleBank::from_entries(
            vec!["empty".to_string(), "full".to_string()],
            vec![RiddleEntry::new("full", "What is 2 + 2?", "4")],
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let entry = bank.pick("empty", &mut rng);
        assert_eq!(entry.question, "What is 2 + 2?");

        let entry = bank.pick("not-a-category", &mut rng);
        assert_eq!(entry.category, "full");
    }

    #[test]
    fn test_answers_are_normalized() {
        let bank = RiddleBank::from_entries(
            vec!["general".to_string()],
            vec![RiddleEntry::new("general", "Shout it", "  HELLO ")],
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(bank.pick("general", &mut rng).answer, "hello");
    }

    #[test]
    fn test_rejects_empty_bank() {
        assert!(RiddleBank::from_entries(vec![], vec![RiddleEntry::new("a", "q", "a")]).is_err());
        assert!(RiddleBank::from_entries(vec!["a".to_string()], vec![]).is_err());
    }
}
