// src/pdf/content.rs
//! Glyph-run decoding from page content streams

use anyhow::{Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object};
use tracing::{debug, warn};

use super::layout::GlyphRun;

/// TJ adjustments at or beyond this many thousandths of an em read as a word gap.
const TJ_SPACE_THRESHOLD: f64 = -200.0;

const IDENTITY: [f64; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Decode every page's text-showing operations into positioned runs.
pub fn glyph_runs_by_page(bytes: &[u8]) -> Result<Vec<Vec<GlyphRun>>> {
    let document = Document::load_mem(bytes).context("Failed to load PDF document")?;

    let pages = document
        .get_pages()
        .into_iter()
        .map(|(page_number, page_id)| {
            let operations = document
                .get_page_content(page_id)
                .context("Failed to read content stream")
                .and_then(|content| {
                    Content::decode(&content)
                        .map(|c| c.operations)
                        .context("Failed to decode content stream")
                });
            page_runs(page_number, operations)
        })
        .collect();

    Ok(pages)
}

/// An unreadable page yields no runs; the remaining pages still count.
fn page_runs(page_number: u32, operations: Result<Vec<Operation>>) -> Vec<GlyphRun> {
    match operations {
        Ok(operations) => {
            let runs = runs_from_operations(&operations);
            debug!("PDF page {}: {} glyph runs", page_number, runs.len());
            runs
        }
        Err(e) => {
            warn!("Skipping PDF page {}: {:#}", page_number, e);
            Vec::new()
        }
    }
}

/// Text-state walk over one content stream. Glyph advance widths are not
/// tracked, so consecutive shows on one line share an origin.
pub fn runs_from_operations(operations: &[Operation]) -> Vec<GlyphRun> {
    let mut state = TextState::default();
    let mut runs = Vec::new();

    for op in operations {
        match op.operator.as_str() {
            "BT" => state.begin(),
            "Tm" => {
                if let Some(m) = matrix(&op.operands) {
                    state.set_matrix(m);
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (operand(op, 0), operand(op, 1)) {
                    state.translate(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (operand(op, 0), operand(op, 1)) {
                    state.leading = -ty;
                    state.translate(tx, ty);
                }
            }
            "TL" => {
                if let Some(leading) = operand(op, 0) {
                    state.leading = leading;
                }
            }
            "T*" => state.next_line(),
            "Tj" => state.show(op.operands.first().and_then(string_text), &mut runs),
            "TJ" => state.show(op.operands.first().and_then(array_text), &mut runs),
            "'" => {
                state.next_line();
                state.show(op.operands.first().and_then(string_text), &mut runs);
            }
            "\"" => {
                state.next_line();
                state.show(op.operands.get(2).and_then(string_text), &mut runs);
            }
            _ => {}
        }
    }

    runs
}

#[derive(Debug, Clone)]
struct TextState {
    line_matrix: [f64; 6],
    text_matrix: [f64; 6],
    leading: f64,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            line_matrix: IDENTITY,
            text_matrix: IDENTITY,
            leading: 0.0,
        }
    }
}

impl TextState {
    fn begin(&mut self) {
        self.line_matrix = IDENTITY;
        self.text_matrix = IDENTITY;
    }

    fn set_matrix(&mut self, m: [f64; 6]) {
        self.line_matrix = m;
        self.text_matrix = m;
    }

    fn translate(&mut self, tx: f64, ty: f64) {
        let [a, b, c, d, e, f] = self.line_matrix;
        self.line_matrix = [a, b, c, d, e + tx * a + ty * c, f + tx * b + ty * d];
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    fn show(&self, text: Option<String>, runs: &mut Vec<GlyphRun>) {
        let Some(text) = text else { return };
        if text.trim().is_empty() {
            return;
        }
        runs.push(GlyphRun {
            text: text.trim().to_string(),
            transform: self.text_matrix,
        });
    }
}

fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

fn operand(op: &Operation, index: usize) -> Option<f64> {
    op.operands.get(index).and_then(number)
}

fn matrix(operands: &[Object]) -> Option<[f64; 6]> {
    if operands.len() < 6 {
        return None;
    }
    let mut m = [0.0; 6];
    for (slot, object) in m.iter_mut().zip(operands) {
        *slot = number(object)?;
    }
    Some(m)
}

fn string_text(object: &Object) -> Option<String> {
    match object {
        Object::String(bytes, _) => decode_pdf_bytes(bytes),
        _ => None,
    }
}

fn array_text(object: &Object) -> Option<String> {
    let Object::Array(items) = object else {
        return None;
    };

    let mut text = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => {
                if let Some(part) = decode_pdf_bytes(bytes) {
                    text.push_str(&part);
                }
            }
            other => {
                if number(other).is_some_and(|adjust| adjust <= TJ_SPACE_THRESHOLD)
                    && !text.ends_with(' ')
                {
                    text.push(' ');
                }
            }
        }
    }

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// UTF-16BE when BOM-prefixed, otherwise Latin-1 with control characters dropped.
fn decode_pdf_bytes(bytes: &[u8]) -> Option<String> {
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        let decoded = String::from_utf16_lossy(&units);
        return if decoded.is_empty() { None } else { Some(decoded) };
    }

    let decoded: String = bytes
        .iter()
        .map(|&b| b as char)
        .filter(|c| !c.is_control())
        .collect();
    if decoded.is_empty() {
        None
    } else {
        Some(decoded)
    }
}
