use crate::session_store::OrderDraft;

/// Render a draft as `"<quantity><item>"` pairs joined with `", "`, in the
/// draft's insertion order.
pub fn format_order(draft: &OrderDraft) -> String {
    draft
        .iter()
        .map(|(item, quantity)| format!("{quantity}{item}"))
        .collect::<Vec<_>>()
        .join(", ")
}
