/// Output port for the visible badge: a short text label over a background
/// color, updated on every block. Pure output, no reads.
pub trait BadgeSurface: Send + Sync {
    fn update(&self, text: &str, color: &str);
}

/// Badge surface that renders through the tracing output. Hosts with a real
/// icon overlay provide their own implementation.
pub struct LogBadge;

impl BadgeSurface for LogBadge {
    fn update(&self, text: &str, color: &str) {
        tracing::info!(target: "badge", text = %text, color = %color, "badge updated");
    }
}
