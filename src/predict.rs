//! Interactive prediction.
//!
//! A [`PredictionSession`] walks a trained tree one level at a time. At a
//! split it emits a query listing the branches and waits for the caller to
//! pick one; at a leaf it emits the prediction. The session only borrows the
//! tree, so any number of sessions can run against the same tree at once.
//!
//! States:
//!
//! * `AtNode(n)`: about to visit node `n` (only before [`PredictionSession::begin`]).
//! * `AwaitingAnswer(n)`: a query for split `n` is outstanding.
//! * `Done(v)`: a leaf was reached, `v` is the prediction.
//! * `Cancelled`: the caller answered [`CANCEL`].
//!
//! An out-of-range answer is rejected with [`RegTreeError::InvalidAnswer`]
//! and the session stays in `AwaitingAnswer` on the same node, ready for
//! another attempt.
//!
//! # Example
//! ```
//! use regtree::data::{Attribute, Dataset, Example, Value};
//! use regtree::predict::{PredictionSession, Reply};
//! use regtree::regression_tree::RegressionTree;
//!
//! let attributes = vec![Attribute::continuous("pgain", 0)];
//! let examples = (0..20)
//!     .map(|i| {
//!         let (x, y) = if i < 10 { (3.0, 1.0) } else { (6.0, 4.0) };
//!         Example::new(vec![Value::Continuous(x)], y)
//!     })
//!     .collect();
//! let mut dataset = Dataset::new(attributes, "class", examples).unwrap();
//! let tree = RegressionTree::fit(&mut dataset);
//!
//! let mut session = PredictionSession::new(&tree);
//! let query = session.begin().unwrap();
//! assert_eq!(
//!     query,
//!     Reply::Query { text: "0: pgain <= 3.0\n1: pgain > 3.0\n".to_string() }
//! );
//! assert!(session.submit_answer(7).is_err());
//! let result = session.submit_answer(1).unwrap();
//! assert_eq!(result, Some(Reply::Prediction { value: 4.0 }));
//! ```

use crate::arena::TreeIndex;
use crate::data::ValueType;
use crate::errors::{ErrorKind, RegTreeError, Result};
use crate::regression_tree::RegressionTree;
use std::convert::TryFrom;
use std::io::{BufRead, Write};

use serde_derive::{Deserialize, Serialize};

/// The answer that ends a session without a prediction.
pub const CANCEL: i64 = -1;

/// A message from the engine to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Reply {
    #[serde(rename = "RESULT")]
    Prediction { value: ValueType },
    #[serde(rename = "QUERY")]
    Query { text: String },
    #[serde(rename = "ERROR")]
    Error { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionState {
    AtNode(TreeIndex),
    AwaitingAnswer(TreeIndex),
    Done(ValueType),
    Cancelled,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionOutcome {
    Predicted(ValueType),
    Cancelled,
}

/// One traversal of a tree driven by external answers.
#[derive(Debug)]
pub struct PredictionSession<'a> {
    tree: &'a RegressionTree,
    state: SessionState,
}

impl<'a> PredictionSession<'a> {
    pub fn new(tree: &'a RegressionTree) -> Self {
        PredictionSession {
            tree,
            state: SessionState::AtNode(tree.root_index()),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The final outcome, once the session has ended.
    pub fn outcome(&self) -> Option<SessionOutcome> {
        match self.state {
            SessionState::Done(value) => Some(SessionOutcome::Predicted(value)),
            SessionState::Cancelled => Some(SessionOutcome::Cancelled),
            _ => None,
        }
    }

    /// Visit the root: a prediction for a leaf-only tree, a query otherwise.
    pub fn begin(&mut self) -> Result<Reply> {
        match self.state {
            SessionState::AtNode(index) => self.enter(index),
            _ => Err(RegTreeError::SessionFinished),
        }
    }

    /// Answer the outstanding query.
    ///
    /// Returns the next reply, or `None` when `answer` is [`CANCEL`].
    pub fn submit_answer(&mut self, answer: i64) -> Result<Option<Reply>> {
        let index = match self.state {
            SessionState::AwaitingAnswer(index) => index,
            _ => return Err(RegTreeError::SessionFinished),
        };
        if answer == CANCEL {
            debug!("prediction cancelled at node {}", index);
            self.state = SessionState::Cancelled;
            return Ok(None);
        }
        let children = self.tree.children(index);
        let branch = match usize::try_from(answer) {
            Ok(branch) if branch < children.len() => branch,
            _ => {
                warn!(
                    "rejected answer {} at node {} ({} branches)",
                    answer,
                    index,
                    children.len()
                );
                return Err(RegTreeError::InvalidAnswer {
                    answer,
                    children: children.len(),
                });
            }
        };
        let child = children[branch];
        self.enter(child).map(Some)
    }

    /// The outstanding query, if the session is waiting for an answer.
    pub fn current_query(&self) -> Option<String> {
        match self.state {
            SessionState::AwaitingAnswer(index) => {
                self.tree.node(index).map(|node| node.formulate_query())
            }
            _ => None,
        }
    }

    fn enter(&mut self, index: TreeIndex) -> Result<Reply> {
        let node = self
            .tree
            .node(index)
            .ok_or_else(|| RegTreeError::CorruptModel(format!("node {} is missing", index)))?;
        match node.predicted_value() {
            Some(value) => {
                debug!("prediction reached leaf {}: {}", index, value);
                self.state = SessionState::Done(value);
                Ok(Reply::Prediction { value })
            }
            None => {
                self.state = SessionState::AwaitingAnswer(index);
                Ok(Reply::Query {
                    text: node.formulate_query(),
                })
            }
        }
    }
}

fn write_reply<W: Write>(writer: &mut W, reply: &Reply) -> Result<()> {
    serde_json::to_writer(&mut *writer, reply)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Drive one session over a line-oriented transport.
///
/// Each reply is written as one JSON object per line; each answer is read
/// as one integer per line. Unparsable or out-of-range answers get an
/// `ERROR` reply followed by the same query again. End of input while a
/// query is outstanding counts as a cancellation.
pub fn run_session<R: BufRead, W: Write>(
    tree: &RegressionTree,
    mut reader: R,
    mut writer: W,
) -> Result<SessionOutcome> {
    let mut session = PredictionSession::new(tree);
    let mut reply = session.begin()?;
    loop {
        write_reply(&mut writer, &reply)?;
        if let Reply::Prediction { value } = reply {
            return Ok(SessionOutcome::Predicted(value));
        }

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            debug!("input closed while awaiting an answer");
            return Ok(SessionOutcome::Cancelled);
        }
        let message = match line.trim().parse::<i64>() {
            Ok(answer) => match session.submit_answer(answer) {
                Ok(Some(next)) => {
                    reply = next;
                    continue;
                }
                Ok(None) => return Ok(SessionOutcome::Cancelled),
                Err(e) => {
                    if e.kind() != ErrorKind::InvalidAnswer {
                        return Err(e);
                    }
                    e.to_string()
                }
            },
            Err(_) => format!("'{}' is not an integer", line.trim()),
        };
        write_reply(&mut writer, &Reply::Error { message })?;
        reply = Reply::Query {
            text: session.current_query().unwrap_or_default(),
        };
    }
}

#[cfg(all(test, feature = "enable_training"))]
mod tests {
    use super::*;
    use crate::data::{Attribute, Dataset, Example, Value};
    use crate::errors::ErrorKind;

    fn leaf_tree(value: f64) -> RegressionTree {
        let attributes = vec![Attribute::continuous("x", 0)];
        let examples = vec![Example::new(vec![Value::Continuous(1.0)], value)];
        let mut ds = Dataset::new(attributes, "y", examples).unwrap();
        RegressionTree::fit(&mut ds)
    }

    /// 30 rows, one discrete attribute with three values: a root split with
    /// three leaf children predicting 1, 2 and 3.
    fn three_way_tree() -> RegressionTree {
        let attributes = vec![Attribute::discrete("motor", 0, vec!["A", "B", "C"])];
        let examples = (0..30)
            .map(|i: usize| {
                let (motor, y) = [("A", 1.0), ("B", 2.0), ("C", 3.0)][i % 3];
                Example::new(vec![Value::Discrete(motor.to_string())], y)
            })
            .collect();
        let mut ds = Dataset::new(attributes, "class", examples).unwrap();
        RegressionTree::fit(&mut ds)
    }

    fn two_way_tree() -> RegressionTree {
        let attributes = vec![Attribute::continuous("pgain", 0)];
        let examples = (0..20)
            .map(|i| {
                let (x, y) = if i < 10 { (5.0, 1.0) } else { (8.0, 2.0) };
                Example::new(vec![Value::Continuous(x)], y)
            })
            .collect();
        let mut ds = Dataset::new(attributes, "class", examples).unwrap();
        RegressionTree::fit(&mut ds)
    }

    #[test]
    fn leaf_tree_answers_immediately() {
        let tree = leaf_tree(42.0);
        let mut session = PredictionSession::new(&tree);
        assert_eq!(session.begin().unwrap(), Reply::Prediction { value: 42.0 });
        assert_eq!(session.state(), SessionState::Done(42.0));
        assert_eq!(session.outcome(), Some(SessionOutcome::Predicted(42.0)));
        assert!(session.current_query().is_none());
    }

    #[test]
    fn cancel_ends_without_result() {
        let tree = three_way_tree();
        let mut session = PredictionSession::new(&tree);
        match session.begin().unwrap() {
            Reply::Query { text } => {
                assert_eq!(text, "0: motor = A\n1: motor = B\n2: motor = C\n");
            }
            other => panic!("expected a query, got {:?}", other),
        }
        assert_eq!(session.submit_answer(CANCEL).unwrap(), None);
        assert_eq!(session.state(), SessionState::Cancelled);
        assert_eq!(session.outcome(), Some(SessionOutcome::Cancelled));
    }

    #[test]
    fn invalid_answer_keeps_session_alive() {
        let tree = two_way_tree();
        let mut session = PredictionSession::new(&tree);
        session.begin().unwrap();
        let root = tree.root_index();

        let err = session.submit_answer(5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAnswer);
        assert_eq!(
            err.to_string(),
            "The answer should be an integer between 0 and 1!"
        );
        assert_eq!(session.state(), SessionState::AwaitingAnswer(root));

        assert!(session.submit_answer(-2).is_err());
        assert!(session.submit_answer(2).is_err());
        assert!(session.submit_answer(1 << 32).is_err());
        assert!(session.submit_answer(i64::MAX).is_err());
        assert!(session.submit_answer(i64::MIN).is_err());
        assert_eq!(session.state(), SessionState::AwaitingAnswer(root));

        assert_eq!(
            session.submit_answer(0).unwrap(),
            Some(Reply::Prediction { value: 1.0 })
        );
    }

    #[test]
    fn finished_sessions_reject_answers() {
        let tree = two_way_tree();
        let mut session = PredictionSession::new(&tree);
        assert!(session.submit_answer(0).is_err());
        session.begin().unwrap();
        assert!(session.begin().is_err());
        session.submit_answer(1).unwrap();
        let err = session.submit_answer(0).unwrap_err();
        match err {
            RegTreeError::SessionFinished => {}
            other => panic!("unexpected error {}", other),
        }
    }

    #[test]
    fn concurrent_sessions_share_a_tree() {
        let tree = three_way_tree();
        let expected = [1.0, 2.0, 3.0];
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..12)
                .map(|t: usize| {
                    let tree = &tree;
                    scope.spawn(move || {
                        let mut session = PredictionSession::new(tree);
                        session.begin().unwrap();
                        // a few bad answers before the real one
                        for bad in 3..(3 + t as i64) {
                            assert!(session.submit_answer(bad).is_err());
                        }
                        session.submit_answer((t % 3) as i64).unwrap()
                    })
                })
                .collect();
            for (t, handle) in handles.into_iter().enumerate() {
                let reply = handle.join().unwrap();
                assert_eq!(
                    reply,
                    Some(Reply::Prediction {
                        value: expected[t % 3]
                    })
                );
            }
        });
    }

    fn replies(output: &[u8]) -> Vec<Reply> {
        String::from_utf8(output.to_vec())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn line_driver_retries_and_predicts() {
        let tree = two_way_tree();
        let mut output = Vec::new();
        let outcome = run_session(&tree, "x\n7\n1\n".as_bytes(), &mut output).unwrap();
        assert_eq!(outcome, SessionOutcome::Predicted(2.0));

        let query = Reply::Query {
            text: "0: pgain <= 5.0\n1: pgain > 5.0\n".to_string(),
        };
        assert_eq!(
            replies(&output),
            vec![
                query.clone(),
                Reply::Error {
                    message: "'x' is not an integer".to_string()
                },
                query.clone(),
                Reply::Error {
                    message: "The answer should be an integer between 0 and 1!".to_string()
                },
                query,
                Reply::Prediction { value: 2.0 },
            ]
        );
    }

    #[test]
    fn line_driver_cancel_and_eof() {
        let tree = two_way_tree();
        let mut output = Vec::new();
        let outcome = run_session(&tree, "-1\n".as_bytes(), &mut output).unwrap();
        assert_eq!(outcome, SessionOutcome::Cancelled);
        assert_eq!(replies(&output).len(), 1);

        let mut output = Vec::new();
        let outcome = run_session(&tree, "".as_bytes(), &mut output).unwrap();
        assert_eq!(outcome, SessionOutcome::Cancelled);
    }

    #[test]
    fn reply_wire_format() {
        let json = serde_json::to_string(&Reply::Prediction { value: 42.0 }).unwrap();
        assert_eq!(json, r#"{"kind":"RESULT","value":42.0}"#);
        let json = serde_json::to_string(&Reply::Query {
            text: "0: a = b\n".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"QUERY","text":"0: a = b\n"}"#);
    }
}
