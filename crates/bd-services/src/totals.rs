//! Hierarchical totals aggregator
//!
//! Chapter subtotals come out of one forward pass over the flat line list
//! with an explicit stack of open chapters; the depth numbers are the only
//! tree structure there is. A chapter stays open until a chapter of the
//! same or shallower depth starts, and a work-item credits every chapter
//! open above it, so a depth-1 subtotal already contains everything its
//! sub-chapters collected.

use bd_core::types::round_cents;
use bd_models::{LineId, LineKind, Quote, QuoteLine};
use serde::Serialize;

/// Final subtotal of one chapter, in document order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSubtotal {
    pub line_id: LineId,
    pub title: String,
    pub depth: u8,
    pub total: f64,
}

/// Output of the aggregation pass
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsReport {
    /// One entry per chapter line, in document order
    pub chapters: Vec<ChapterSubtotal>,
    /// Sum of every work-item amount, chapters or not
    pub grand_total: f64,
}

impl TotalsReport {
    pub fn subtotal_for(&self, line_id: LineId) -> Option<f64> {
        self.chapters
            .iter()
            .find(|chapter| chapter.line_id == line_id)
            .map(|chapter| chapter.total)
    }
}

struct OpenChapter {
    line_id: LineId,
    position: usize,
    title: String,
    depth: u8,
    running_total: f64,
}

pub fn aggregate(quote: &Quote) -> TotalsReport {
    aggregate_lines(&quote.lines)
}

pub fn aggregate_lines(lines: &[QuoteLine]) -> TotalsReport {
    let mut stack: Vec<OpenChapter> = Vec::new();
    let mut closed: Vec<(usize, ChapterSubtotal)> = Vec::new();
    let mut grand_total = 0.0;

    for (position, line) in lines.iter().enumerate() {
        match &line.kind {
            LineKind::Chapter { title } => {
                // a sibling or shallower chapter closes everything at or
                // below its depth
                while stack.last().is_some_and(|open| open.depth >= line.depth) {
                    finalize(stack.pop(), &mut closed);
                }
                stack.push(OpenChapter {
                    line_id: line.id,
                    position,
                    title: title.clone(),
                    depth: line.depth,
                    running_total: 0.0,
                });
            }
            LineKind::WorkItem { .. } => {
                let amount = line.amount();
                for open in stack.iter_mut() {
                    open.running_total += amount;
                }
                grand_total += amount;
            }
            LineKind::Text { .. } => {}
        }
    }

    while !stack.is_empty() {
        finalize(stack.pop(), &mut closed);
    }

    closed.sort_by_key(|(position, _)| *position);
    TotalsReport {
        chapters: closed.into_iter().map(|(_, chapter)| chapter).collect(),
        grand_total: round_cents(grand_total),
    }
}

fn finalize(open: Option<OpenChapter>, closed: &mut Vec<(usize, ChapterSubtotal)>) {
    if let Some(open) = open {
        closed.push((
            open.position,
            ChapterSubtotal {
                line_id: open.line_id,
                title: open.title,
                depth: open.depth,
                total: round_cents(open.running_total),
            },
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(id: LineId, title: &str, depth: u8) -> QuoteLine {
        QuoteLine::chapter(id, title, depth)
    }

    fn work(id: LineId, amount: f64) -> QuoteLine {
        QuoteLine {
            id,
            depth: 1,
            kind: LineKind::WorkItem {
                assembly_id: None,
                reference: "X".to_string(),
                description: String::new(),
                quantity: 1.0,
                unit: "u".to_string(),
                unit_sale_price: amount,
                components: Vec::new(),
            },
        }
    }

    #[test]
    fn test_nested_chapters_accumulate_upwards() {
        let lines = vec![
            chapter(1, "A", 1),
            work(2, 5.0),
            chapter(3, "A.1", 2),
            work(4, 3.0),
            chapter(5, "A.2", 2),
            work(6, 2.0),
        ];

        let report = aggregate_lines(&lines);
        assert_eq!(report.subtotal_for(3), Some(3.0));
        assert_eq!(report.subtotal_for(5), Some(2.0));
        assert_eq!(report.subtotal_for(1), Some(10.0));
        assert_eq!(report.grand_total, 10.0);
    }

    #[test]
    fn test_sibling_closes_sibling() {
        let lines = vec![
            chapter(1, "X", 2),
            work(2, 4.0),
            chapter(3, "Y", 2),
            work(4, 6.0),
        ];

        let report = aggregate_lines(&lines);
        assert_eq!(report.subtotal_for(1), Some(4.0));
        assert_eq!(report.subtotal_for(3), Some(6.0));
        assert_eq!(report.grand_total, 10.0);
    }

    #[test]
    fn test_no_chapters_reports_flat_total() {
        let lines = vec![work(1, 10.0), work(2, 20.0), work(3, 30.0)];

        let report = aggregate_lines(&lines);
        assert!(report.chapters.is_empty());
        assert_eq!(report.grand_total, 60.0);
    }

    #[test]
    fn test_text_lines_do_not_count() {
        let lines = vec![
            chapter(1, "A", 1),
            QuoteLine::text(2, "a note", 1),
            work(3, 7.5),
        ];

        let report = aggregate_lines(&lines);
        assert_eq!(report.subtotal_for(1), Some(7.5));
        assert_eq!(report.grand_total, 7.5);
    }

    #[test]
    fn test_three_levels_deep() {
        let lines = vec![
            chapter(1, "A", 1),
            chapter(2, "A.1", 2),
            chapter(3, "A.1.1", 3),
            work(4, 1.0),
            chapter(5, "A.2", 2),
            work(6, 10.0),
        ];

        let report = aggregate_lines(&lines);
        assert_eq!(report.subtotal_for(3), Some(1.0));
        // A.1 contains only its sub-chapter's item
        assert_eq!(report.subtotal_for(2), Some(1.0));
        assert_eq!(report.subtotal_for(5), Some(10.0));
        assert_eq!(report.subtotal_for(1), Some(11.0));
    }

    #[test]
    fn test_shallower_chapter_closes_deeper_run() {
        let lines = vec![
            chapter(1, "A", 1),
            chapter(2, "A.1", 3),
            work(3, 2.0),
            chapter(4, "B", 1),
            work(5, 9.0),
        ];

        let report = aggregate_lines(&lines);
        assert_eq!(report.subtotal_for(2), Some(2.0));
        assert_eq!(report.subtotal_for(1), Some(2.0));
        assert_eq!(report.subtotal_for(4), Some(9.0));
        assert_eq!(report.grand_total, 11.0);
    }

    #[test]
    fn test_report_is_in_document_order() {
        let lines = vec![
            chapter(1, "A", 1),
            chapter(2, "A.1", 2),
            work(3, 1.0),
            chapter(4, "B", 1),
        ];

        let report = aggregate_lines(&lines);
        let ids: Vec<LineId> = report.chapters.iter().map(|c| c.line_id).collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[test]
    fn test_empty_quote() {
        let report = aggregate_lines(&[]);
        assert!(report.chapters.is_empty());
        assert_eq!(report.grand_total, 0.0);
    }
}
