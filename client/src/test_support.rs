//! Test utilities for the client crate.
//!
//! Shared helpers for both unit tests (in `src/`) and integration tests
//! (in `tests/`). Compiled under `cfg(test)` or the `test-support`
//! feature so integration suites can reuse them.

pub mod gateway {
    //! Scripted gateway double recording every dispatched call.
    //!
    //! Mock expectations suit single-module tests; scenario suites read
    //! better with a queue of canned replies and a call transcript to
    //! assert over afterwards.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use crate::domain::ports::{ApiError, ApiGateway};

    /// One dispatched call, as recorded by [`ScriptedGateway`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedCall {
        pub method: &'static str,
        pub path: String,
        pub body: Option<Value>,
    }

    /// Gateway double replaying a scripted queue of replies.
    #[derive(Debug, Default)]
    pub struct ScriptedGateway {
        replies: Mutex<VecDeque<Result<Value, ApiError>>>,
        byte_replies: Mutex<VecDeque<Result<Vec<u8>, ApiError>>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl ScriptedGateway {
        /// Queue a successful JSON reply.
        pub fn push_ok(&self, reply: Value) {
            self.push_reply(Ok(reply));
        }

        /// Queue an error reply.
        pub fn push_error(&self, error: ApiError) {
            self.push_reply(Err(error));
        }

        /// Queue a raw JSON-or-error reply.
        pub fn push_reply(&self, reply: Result<Value, ApiError>) {
            self.replies.lock().expect("replies lock").push_back(reply);
        }

        /// Queue a byte reply for `get_bytes`.
        pub fn push_bytes(&self, reply: Result<Vec<u8>, ApiError>) {
            self.byte_replies
                .lock()
                .expect("byte replies lock")
                .push_back(reply);
        }

        /// Transcript of every call dispatched so far.
        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().expect("calls lock").clone()
        }

        /// Paths of every call dispatched so far.
        pub fn paths(&self) -> Vec<String> {
            self.calls().into_iter().map(|call| call.path).collect()
        }

        fn record(&self, method: &'static str, path: &str, body: Option<&Value>) {
            self.calls.lock().expect("calls lock").push(RecordedCall {
                method,
                path: path.to_owned(),
                body: body.cloned(),
            });
        }

        fn next_reply(&self, method: &'static str, path: &str) -> Result<Value, ApiError> {
            self.replies
                .lock()
                .expect("replies lock")
                .pop_front()
                .unwrap_or_else(|| panic!("no scripted reply left for {method} {path}"))
        }
    }

    #[async_trait]
    impl ApiGateway for ScriptedGateway {
        async fn get(&self, path: &str) -> Result<Value, ApiError> {
            self.record("GET", path, None);
            self.next_reply("GET", path)
        }

        async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
            self.record("POST", path, Some(body));
            self.next_reply("POST", path)
        }

        async fn put(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
            self.record("PUT", path, Some(body));
            self.next_reply("PUT", path)
        }

        async fn delete(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
            self.record("DELETE", path, body.as_ref());
            self.next_reply("DELETE", path)
        }

        async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
            self.record("GET", path, None);
            self.byte_replies
                .lock()
                .expect("byte replies lock")
                .pop_front()
                .unwrap_or_else(|| panic!("no scripted byte reply left for GET {path}"))
        }
    }
}

pub mod sleepers {
    //! Sleeper doubles driving poll loops deterministically.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::domain::sync::Sleeper;

    /// Sleeper that never waits; poll loops free-run until aborted.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct ImmediateSleeper;

    #[async_trait]
    impl Sleeper for ImmediateSleeper {
        async fn sleep(&self, _duration: Duration) {}
    }

    /// Sleeper released one tick at a time by the test.
    #[derive(Debug, Default)]
    pub struct ManualSleeper {
        started: AtomicUsize,
        release: Notify,
    }

    impl ManualSleeper {
        /// Number of sleeps entered so far.
        pub fn sleeps_started(&self) -> usize {
            self.started.load(Ordering::SeqCst)
        }

        /// Release the pending (or next) sleep.
        pub fn release_one(&self) {
            self.release.notify_one();
        }
    }

    #[async_trait]
    impl Sleeper for ManualSleeper {
        async fn sleep(&self, _duration: Duration) {
            self.started.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
        }
    }
}

pub mod storage {
    //! Filesystem store helpers backed by temporary directories.

    use crate::outbound::storage::FileIdentityStore;

    /// Open a file store in a fresh temporary directory.
    ///
    /// The directory guard must stay alive for as long as the store is
    /// used; dropping it deletes the backing files.
    pub fn temp_file_store() -> (tempfile::TempDir, FileIdentityStore) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = FileIdentityStore::open(dir.path()).expect("open file store");
        (dir, store)
    }
}
