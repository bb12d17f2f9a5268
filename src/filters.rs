//! Composable predicates over incoming updates.
//!
//! A [`Filter`] is a tree: leaves wrap plain predicates, inner nodes
//! combine their children with a single [`Operator`]. Chaining with
//! [`Filter::and`] / [`Filter::or`] always nests, so a node never mixes
//! operators.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::FilterError;
use crate::types::{Message, Update, UpdateCategory};

pub type Predicate = Arc<dyn Fn(&Update) -> bool + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "and" => Ok(Operator::And),
            "or" => Ok(Operator::Or),
            other => Err(FilterError::UnknownOperator(other.to_string())),
        }
    }
}

#[derive(Clone)]
pub enum Filter {
    Leaf(Predicate),
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn leaf<F>(predicate: F) -> Self
    where
        F: Fn(&Update) -> bool + Send + Sync + 'static,
    {
        Filter::Leaf(Arc::new(predicate))
    }

    /// Combine `children` under `op`. At least one child is required.
    pub fn combine<I>(op: Operator, children: I) -> Result<Self, FilterError>
    where
        I: IntoIterator,
        I::Item: Into<Filter>,
    {
        let children: Vec<Filter> = children.into_iter().map(Into::into).collect();
        if children.is_empty() {
            return Err(FilterError::Empty(op.as_str()));
        }
        Ok(match op {
            Operator::And => Filter::And(children),
            Operator::Or => Filter::Or(children),
        })
    }

    pub fn and(self, other: impl Into<Filter>) -> Self {
        Filter::And(vec![self, other.into()])
    }

    pub fn or(self, other: impl Into<Filter>) -> Self {
        Filter::Or(vec![self, other.into()])
    }

    /// Evaluate against `update`, short-circuiting left to right.
    pub fn check(&self, update: &Update) -> bool {
        match self {
            Filter::Leaf(predicate) => predicate(update),
            Filter::And(children) => children.iter().all(|child| child.check(update)),
            Filter::Or(children) => children.iter().any(|child| child.check(update)),
        }
    }

    /// Accepts updates of any of the given categories.
    pub fn categories(categories: impl IntoIterator<Item = UpdateCategory>) -> Self {
        let allowed: HashSet<UpdateCategory> = categories.into_iter().collect();
        Filter::leaf(move |update| allowed.contains(&update.category()))
    }

    /// Like [`Filter::categories`], from wire names such as `"callback_query"`.
    pub fn category_names<I, S>(names: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let categories = names
            .into_iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<UpdateCategory>, _>>()?;
        Ok(Filter::categories(categories))
    }

    /// Accepts updates whose sender id is in `ids`.
    ///
    /// Channel posts and anonymous admin messages match on the sender chat id.
    pub fn sender_in(ids: impl IntoIterator<Item = i64>) -> Self {
        let ids: HashSet<i64> = ids.into_iter().collect();
        Filter::leaf(move |update| update.sender_id().is_some_and(|id| ids.contains(&id)))
    }

    pub fn chat_in(ids: impl IntoIterator<Item = i64>) -> Self {
        let ids: HashSet<i64> = ids.into_iter().collect();
        Filter::leaf(move |update| update.chat().is_some_and(|chat| ids.contains(&chat.id)))
    }

    /// Accepts messages starting with `/name`, with or without `@botname`.
    pub fn command(name: impl Into<String>) -> Self {
        let name = name.into();
        let name = name.trim_start_matches('/').to_string();
        Filter::leaf(move |update| {
            update
                .message()
                .and_then(Message::command)
                .is_some_and(|(command, _)| command == name)
        })
    }
}

impl<F> From<F> for Filter
where
    F: Fn(&Update) -> bool + Send + Sync + 'static,
{
    fn from(predicate: F) -> Self {
        Filter::leaf(predicate)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Leaf(_) => f.write_str("Leaf(..)"),
            Filter::And(children) => f.debug_tuple("And").field(children).finish(),
            Filter::Or(children) => f.debug_tuple("Or").field(children).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_record;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn message_update(user_id: i64, text: &str) -> Update {
        decode_record(json!({
            "update_id": 1,
            "message": {
                "message_id": 10,
                "from": {"id": user_id, "first_name": "Ann"},
                "chat": {"id": -100, "type": "group"},
                "text": text
            }
        }))
        .unwrap()
    }

    fn counting(result: bool, counter: &Arc<AtomicUsize>) -> Filter {
        let counter = counter.clone();
        Filter::leaf(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            result
        })
    }

    #[test]
    fn test_and_rejects_when_any_leaf_is_false() {
        let filter = Filter::combine(
            Operator::And,
            vec![
                Filter::leaf(|_| true),
                Filter::leaf(|_| false),
                Filter::leaf(|_| true),
            ],
        )
        .unwrap();
        assert!(!filter.check(&message_update(1, "hi")));
    }

    #[test]
    fn test_or_accepts_when_any_leaf_is_true() {
        let filter = Filter::combine(
            Operator::Or,
            vec![Filter::leaf(|_| false), Filter::leaf(|_| true)],
        )
        .unwrap();
        assert!(filter.check(&message_update(1, "hi")));
    }

    #[test]
    fn test_or_rejects_only_when_every_leaf_is_false() {
        let filter = Filter::combine(
            Operator::Or,
            vec![
                Filter::leaf(|_| false),
                Filter::leaf(|_| false),
                Filter::leaf(|_| false),
            ],
        )
        .unwrap();
        assert!(!filter.check(&message_update(1, "hi")));
    }

    #[test]
    fn test_evaluation_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let update = message_update(1, "hi");

        let and = Filter::combine(Operator::And, vec![counting(false, &calls), counting(true, &calls)])
            .unwrap();
        assert!(!and.check(&update));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        calls.store(0, Ordering::SeqCst);
        let or = Filter::combine(Operator::Or, vec![counting(true, &calls), counting(false, &calls)])
            .unwrap();
        assert!(or.check(&update));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalid_combinations_fail_eagerly() {
        assert_eq!(
            Filter::combine(Operator::Or, Vec::<Filter>::new()).unwrap_err(),
            FilterError::Empty("or")
        );
        assert_eq!(
            "xor".parse::<Operator>().unwrap_err(),
            FilterError::UnknownOperator("xor".to_string())
        );
        assert!(Filter::category_names(["message", "telepathy"]).is_err());
    }

    #[test]
    fn test_closures_convert_into_leaves() {
        let filter = Filter::combine(
            Operator::And,
            vec![
                Filter::from(|u: &Update| u.update_id == 1),
                Filter::from(|u: &Update| u.message().is_some()),
            ],
        )
        .unwrap();
        assert!(filter.check(&message_update(1, "hi")));
    }

    #[test]
    fn test_chaining_nests() {
        let filter = Filter::leaf(|_| false)
            .and(|_: &Update| true)
            .or(|_: &Update| true);

        match &filter {
            Filter::Or(children) => {
                assert_eq!(children.len(), 2);
                assert!(matches!(children[0], Filter::And(_)));
            }
            other => panic!("expected Or at the root, got {:?}", other),
        }
        assert!(filter.check(&message_update(1, "hi")));
    }

    #[test]
    fn test_builtin_filters() {
        let update = message_update(42, "/start@my_bot now");

        assert!(Filter::sender_in([42]).check(&update));
        assert!(!Filter::sender_in([7]).check(&update));
        assert!(Filter::chat_in([-100]).check(&update));
        assert!(Filter::categories([UpdateCategory::Message]).check(&update));
        assert!(!Filter::categories([UpdateCategory::CallbackQuery]).check(&update));
        assert!(Filter::command("start").check(&update));
        assert!(Filter::command("/start").check(&update));
        assert!(!Filter::command("stop").check(&update));
        assert!(!Filter::command("start").check(&message_update(42, "start")));
    }
}
