//! Initialization-once resource handle.
//!
//! [`InitOnce`] holds a process-wide resource that is loaded on first use.
//! Its lifecycle is `Uninitialized → Loading → Ready`. Callers arriving while
//! the resource is loading wait and are released together once it is ready.
//! A failed load returns the handle to `Uninitialized` and the next caller
//! tries again.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tokio::sync::OnceCell;

/// Lifecycle state of an [`InitOnce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InitState {
    /// Nothing loaded yet, or the last load failed.
    Uninitialized,
    /// A caller is running the loader.
    Loading,
    /// The resource is available.
    Ready,
}

/// A resource loaded at most once, on first use.
///
/// # Example
///
/// ```
/// use wage_engine::resource::{InitOnce, InitState};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let handle: InitOnce<u32> = InitOnce::new();
/// assert_eq!(handle.state(), InitState::Uninitialized);
///
/// let value = handle
///     .get_or_try_init(|| async { Ok::<_, std::io::Error>(42) })
///     .await
///     .unwrap();
/// assert_eq!(*value, 42);
/// assert_eq!(handle.state(), InitState::Ready);
/// # }
/// ```
#[derive(Debug)]
pub struct InitOnce<T> {
    cell: OnceCell<T>,
    loading: AtomicBool,
}

struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<T> Default for InitOnce<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> InitOnce<T> {
    /// Creates an uninitialized handle.
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
            loading: AtomicBool::new(false),
        }
    }

    /// Creates a handle that is already `Ready` with `value`.
    pub fn ready(value: T) -> Self {
        Self {
            cell: OnceCell::new_with(Some(value)),
            loading: AtomicBool::new(false),
        }
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> InitState {
        if self.cell.initialized() {
            InitState::Ready
        } else if self.loading.load(Ordering::SeqCst) {
            InitState::Loading
        } else {
            InitState::Uninitialized
        }
    }

    /// Returns the resource if it is ready.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// Returns the resource, running `init` if nobody has loaded it yet.
    ///
    /// Only one caller runs `init` at a time; the others wait for it. If
    /// `init` fails its error goes to that caller alone and a waiting caller
    /// runs its own `init`.
    pub async fn get_or_try_init<F, Fut, E>(&self, init: F) -> Result<&T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.cell
            .get_or_try_init(|| async move {
                let _guard = LoadingGuard::enter(&self.loading);
                init().await
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_starts_uninitialized() {
        let handle: InitOnce<u32> = InitOnce::new();
        assert_eq!(handle.state(), InitState::Uninitialized);
        assert!(handle.get().is_none());
    }

    #[tokio::test]
    async fn test_ready_handle_skips_loader() {
        let handle = InitOnce::ready(3_u32);
        assert_eq!(handle.state(), InitState::Ready);

        let value = handle
            .get_or_try_init(|| async { Err::<u32, _>("not called") })
            .await
            .unwrap();
        assert_eq!(*value, 3);
    }

    #[tokio::test]
    async fn test_ready_after_successful_load() {
        let handle: InitOnce<String> = InitOnce::new();
        let value = handle
            .get_or_try_init(|| async { Ok::<_, String>("loaded".to_string()) })
            .await
            .unwrap();
        assert_eq!(value, "loaded");
        assert_eq!(handle.state(), InitState::Ready);
        assert_eq!(handle.get().map(String::as_str), Some("loaded"));
    }

    #[tokio::test]
    async fn test_failed_load_returns_to_uninitialized() {
        let handle: InitOnce<u32> = InitOnce::new();

        let first = handle
            .get_or_try_init(|| async { Err::<u32, _>("disk unavailable") })
            .await;
        assert_eq!(first.unwrap_err(), "disk unavailable");
        assert_eq!(handle.state(), InitState::Uninitialized);

        let second = handle
            .get_or_try_init(|| async { Ok::<_, &str>(7) })
            .await
            .unwrap();
        assert_eq!(*second, 7);
        assert_eq!(handle.state(), InitState::Ready);
    }

    #[tokio::test]
    async fn test_loader_runs_once_for_concurrent_callers() {
        let handle: Arc<InitOnce<u32>> = Arc::new(InitOnce::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let handle = Arc::clone(&handle);
            let calls = Arc::clone(&calls);
            tasks.push(tokio::spawn(async move {
                let value = handle
                    .get_or_try_init(|| async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::task::yield_now().await;
                        Ok::<_, String>(99)
                    })
                    .await
                    .unwrap();
                *value
            }));
        }

        for task in tasks {
            assert_eq!(task.await.unwrap(), 99);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_waiters_released_when_ready() {
        let handle: Arc<InitOnce<u32>> = Arc::new(InitOnce::new());
        let (started_tx, started_rx) = oneshot::channel::<()>();
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let loader = {
            let handle = Arc::clone(&handle);
            tokio::spawn(async move {
                let value = handle
                    .get_or_try_init(|| async move {
                        let _ = started_tx.send(());
                        let _ = release_rx.await;
                        Ok::<_, String>(5)
                    })
                    .await
                    .unwrap();
                *value
            })
        };

        started_rx.await.unwrap();
        assert_eq!(handle.state(), InitState::Loading);

        let waiter = {
            let handle = Arc::clone(&handle);
            tokio::spawn(async move {
                let value = handle
                    .get_or_try_init(|| async { Ok::<_, String>(0) })
                    .await
                    .unwrap();
                *value
            })
        };

        release_tx.send(()).unwrap();
        assert_eq!(loader.await.unwrap(), 5);
        assert_eq!(waiter.await.unwrap(), 5);
        assert_eq!(handle.state(), InitState::Ready);
    }
}
