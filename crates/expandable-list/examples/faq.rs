//! FAQ screen demo.
//!
//! A list of questions, each expanding to reveal its answer. The "list view"
//! is a console host that prints every notification it receives.
//!
//! Run with: cargo run -p expandable-list --example faq
//!
//! Set `RUST_LOG=expandable_list=debug` to see the adapter's own logs.

use std::sync::Arc;

use expandable_list::{
    ExpandableAdapter, ExpandableListAdapter, ExpandingItems, Group, LinearLayout, ListHost,
    NestedList, ParentHolder, ParentRowView, ViewNode, ViewType,
};
use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

const QUESTIONS: [(&str, &str); 3] = [
    (
        "How do I expand a question?",
        "Tap it. Tap it again to collapse it.",
    ),
    (
        "Can several answers be open at once?",
        "Yes, unless the screen runs in accordion mode.",
    ),
    (
        "Is my expansion state saved?",
        "No. Every screen starts with all questions collapsed.",
    ),
];

// =============================================================================
// Payloads
// =============================================================================

#[derive(Debug, Clone)]
struct Question {
    question: String,
    answer: String,
}

#[derive(Debug, Clone)]
struct Answer {
    answer: String,
}

impl ExpandingItems for Question {
    type Item = Answer;

    fn expanding_items(&self) -> Vec<Answer> {
        vec![Answer {
            answer: self.answer.clone(),
        }]
    }
}

// =============================================================================
// Rows
// =============================================================================

struct QuestionRow {
    text: Mutex<String>,
    answers: Arc<NestedList<FaqAdapter>>,
}

impl ParentRowView<FaqAdapter> for QuestionRow {
    fn child_views(&self) -> Vec<ViewNode<FaqAdapter>> {
        vec![ViewNode::Other, ViewNode::NestedList(self.answers.clone())]
    }
}

struct AnswerRow {
    text: Mutex<String>,
}

// =============================================================================
// Adapter
// =============================================================================

struct FaqAdapter {
    accordion: bool,
}

impl ExpandableAdapter for FaqAdapter {
    type Parent = Question;
    type Child = Answer;
    type ParentRow = QuestionRow;
    type ChildRow = AnswerRow;

    fn create_parent_row(&self, _view_type: ViewType) -> QuestionRow {
        QuestionRow {
            text: Mutex::new(String::new()),
            answers: Arc::new(NestedList::new()),
        }
    }

    fn bind_parent_row(&self, row: &QuestionRow, parent: &Question, _position: usize) {
        *row.text.lock() = parent.question.clone();
    }

    fn create_child_row(&self, _view_type: ViewType) -> AnswerRow {
        AnswerRow {
            text: Mutex::new(String::new()),
        }
    }

    fn bind_child_row(&self, row: &AnswerRow, child: &Answer, _parent: &Question, _position: usize) {
        *row.text.lock() = child.answer.clone();
    }

    fn on_expandable_clicked(&self, _row: &QuestionRow, parent: &Question) {
        println!("  clicked: {}", parent.question);
    }

    fn on_expanded_clicked(
        &self,
        _parent_row: &QuestionRow,
        _child_row: &AnswerRow,
        child: &Answer,
        _parent: &Question,
    ) {
        println!("  answer clicked: {}", child.answer);
    }

    fn is_single_expansion(&self) -> bool {
        self.accordion
    }
}

// =============================================================================
// Console list view
// =============================================================================

struct ConsoleList;

impl ListHost for ConsoleList {
    fn set_layout(&self, layout: LinearLayout) {
        println!("  [list] layout {:?}", layout.orientation);
    }

    fn notify_item_changed(&self, position: usize) {
        println!("  [list] rebind row {}", position);
    }

    fn notify_item_inserted(&self, position: usize) {
        println!("  [list] insert row {}", position);
    }

    fn notify_item_removed(&self, position: usize) {
        println!("  [list] remove row {}", position);
    }

    fn notify_item_range_changed(&self, start: usize, count: usize) {
        println!("  [list] rebind rows {}..{}", start, start + count);
    }

    fn smooth_scroll_to_position(&self, position: usize) {
        println!("  [list] scroll to row {}", position);
    }
}

fn print_rows(adapter: &ExpandableListAdapter<FaqAdapter>, rows: &[Arc<ParentHolder<FaqAdapter>>]) {
    for (position, row) in rows.iter().enumerate() {
        if adapter.bind_parent_row(row, position).is_err() {
            continue;
        }
        let marker = match row.nested_list() {
            Some(nested) if nested.is_visible() => "v",
            _ => ">",
        };
        println!("  {} {}", marker, row.row().text.lock());

        let Some(answers) = row.nested_list().filter(|n| n.is_visible()).and_then(|n| n.adapter())
        else {
            continue;
        };
        for index in 0..answers.item_count() {
            let answer = answers.create_row(0);
            if answers.bind_row(&answer, index).is_ok() {
                println!("      {}", answer.row().text.lock());
            }
        }
    }
}

fn run(accordion: bool) -> expandable_list::Result<()> {
    println!(
        "\n=== FAQ ({}) ===",
        if accordion { "accordion" } else { "multiple" }
    );

    let groups = QUESTIONS
        .iter()
        .map(|(question, answer)| {
            Group::from_payload(Question {
                question: question.to_string(),
                answer: answer.to_string(),
            })
        })
        .collect();

    let adapter = ExpandableListAdapter::builder(FaqAdapter { accordion })
        .groups(groups)
        .worker_name("faq-expansion")
        .build()?;
    adapter.attach(Arc::new(ConsoleList));

    // Start from a known state, the way the screen does on creation.
    adapter.set_expanded(false)?;
    adapter.wait_for_background()?;
    adapter.process_pending();

    let rows: Vec<_> = (0..adapter.item_count())
        .map(|_| adapter.create_parent_row(0))
        .collect();
    print_rows(&adapter, &rows);

    for tap in [0, 2, 0] {
        println!("\n> tap question {}", tap);
        adapter.click_parent_row(&rows[tap])?;
        print_rows(&adapter, &rows);
    }

    if let Some(answers) = rows[2].nested_list().and_then(|n| n.adapter()) {
        let answer = answers.create_row(0);
        answers.bind_row(&answer, 0)?;
        println!("\n> tap the answer under question 2");
        answers.click_row(&answer)?;
    }

    println!("\n> expand all");
    adapter.set_expanded(true)?;
    adapter.wait_for_background()?;
    adapter.process_pending();
    print_rows(&adapter, &rows);

    adapter.detach();
    Ok(())
}

fn main() -> expandable_list::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("expandable_list=warn")),
        )
        .init();

    run(false)?;
    run(true)
}
