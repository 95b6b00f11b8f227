/// Blocking user notification surface. The shell prints synchronously;
/// tests record the messages.
pub trait Notifier: Send + Sync + 'static {
    fn alert(&self, message: &str);
}
