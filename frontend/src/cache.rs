use crate::models::{Category, Expense, UNKNOWN_CATEGORY};

/// Sequence number taken when a fetch starts. Completions carrying an
/// older ticket than the last applied one are dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// In-memory copy of server-owned expenses and categories, in server order.
/// Each collection is only ever replaced wholesale.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataCache {
    expenses: Vec<Expense>,
    categories: Vec<Category>,
    next_ticket: u64,
    applied_expenses: Option<FetchTicket>,
    applied_categories: Option<FetchTicket>,
}

impl DataCache {
    pub fn with_data(expenses: Vec<Expense>, categories: Vec<Category>) -> Self {
        Self {
            expenses,
            categories,
            ..Self::default()
        }
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: i64) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn category_name(&self, id: i64) -> &str {
        self.category(id)
            .map(|c| c.name.as_str())
            .unwrap_or(UNKNOWN_CATEGORY)
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.next_ticket += 1;
        FetchTicket(self.next_ticket)
    }

    /// Returns false when a newer expense fetch has already landed.
    pub fn apply_expenses(&mut self, ticket: FetchTicket, expenses: Vec<Expense>) -> bool {
        if is_stale(self.applied_expenses, ticket) {
            log::debug!("dropping stale expense list {:?}", ticket);
            return false;
        }
        self.applied_expenses = Some(ticket);
        self.expenses = expenses;
        true
    }

    pub fn apply_categories(&mut self, ticket: FetchTicket, categories: Vec<Category>) -> bool {
        if is_stale(self.applied_categories, ticket) {
            log::debug!("dropping stale category list {:?}", ticket);
            return false;
        }
        self.applied_categories = Some(ticket);
        self.categories = categories;
        true
    }

    /// Drops a category the backend just deleted, ahead of the next refetch.
    /// Category fetches already in flight predate the delete and are
    /// dropped when they land.
    pub fn remove_category(&mut self, id: i64) {
        self.categories.retain(|c| c.id != id);
        let ticket = self.begin_fetch();
        self.applied_categories = Some(ticket);
    }

    pub fn clear(&mut self) {
        self.expenses.clear();
        self.categories.clear();
    }
}

fn is_stale(applied: Option<FetchTicket>, ticket: FetchTicket) -> bool {
    applied.map_or(false, |last| ticket <= last)
}
