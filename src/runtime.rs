//! Runtime abstraction layer for async operations
//!
//! The location component never reaches for an ambient executor. Whoever builds
//! it hands over an [`AsyncSpawner`], and the stale watchdog schedules its
//! single timer through it.

use crate::prelude::{Arc, Duration, Future, Pin};

pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A trait for spawning async tasks (object-safe version)
pub trait AsyncSpawner: Send + Sync + 'static {
    /// Spawn a future and return a handle to it
    fn spawn_boxed(&self, future: BoxFuture) -> Box<dyn AsyncHandle>;

    /// A future that completes after `duration` on this runtime's clock
    fn delay(&self, duration: Duration) -> BoxFuture;
}

/// Handle to a spawned async task
pub trait AsyncHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;

    /// Cancel the task. Cancelling a finished task is a no-op.
    fn cancel(&self);
}

/// Spawn `task` after `duration` has elapsed.
pub fn spawn_after<F>(spawner: &dyn AsyncSpawner, duration: Duration, task: F) -> Box<dyn AsyncHandle>
where
    F: FnOnce() + Send + 'static,
{
    let delay = spawner.delay(duration);
    spawner.spawn_boxed(Box::pin(async move {
        delay.await;
        task();
    }))
}

/// Default spawner implementations
pub mod spawners {
    use super::*;

    #[cfg(feature = "tokio-runtime")]
    pub mod tokio_impl {
        use super::*;
        use crate::{LocationError, Result};
        use ::tokio::runtime::Handle;
        use ::tokio::task::JoinHandle;

        /// Tokio-based async spawner bound to one runtime
        #[derive(Debug, Clone)]
        pub struct TokioSpawner {
            handle: Handle,
        }

        impl TokioSpawner {
            pub fn new(handle: Handle) -> Self {
                Self { handle }
            }

            /// Bind to the runtime the caller is running on.
            pub fn current() -> Result<Self> {
                Handle::try_current()
                    .map(Self::new)
                    .map_err(|e| LocationError::Runtime(e.to_string()))
            }
        }

        impl AsyncSpawner for TokioSpawner {
            fn spawn_boxed(&self, future: BoxFuture) -> Box<dyn AsyncHandle> {
                let handle = self.handle.spawn(future);
                Box::new(TokioHandle(handle))
            }

            fn delay(&self, duration: Duration) -> BoxFuture {
                // Callers may sit on threads outside the runtime; the timer
                // must register with this runtime's driver and clock.
                let _guard = self.handle.enter();
                Box::pin(::tokio::time::sleep(duration))
            }
        }

        struct TokioHandle(JoinHandle<()>);

        impl AsyncHandle for TokioHandle {
            fn is_finished(&self) -> bool {
                self.0.is_finished()
            }

            fn cancel(&self) {
                self.0.abort();
            }
        }
    }
}

#[cfg(feature = "tokio-runtime")]
pub use spawners::tokio_impl::TokioSpawner;

/// The spawner used when the builder is given none.
pub fn default_spawner() -> crate::Result<Arc<dyn AsyncSpawner>> {
    #[cfg(feature = "tokio-runtime")]
    {
        Ok(Arc::new(TokioSpawner::current()?))
    }

    #[cfg(not(feature = "tokio-runtime"))]
    {
        Err(crate::LocationError::MissingDependency("async spawner"))
    }
}
