//! Paginated request engine
//!
//! A [`PaginatedRequest`] is bound to one logical query ("search for cats") and
//! walks its pages. It owns a [`Cursor`](cursor::Cursor), de-duplicates
//! concurrent page requests, retries transient failures with quadratic backoff
//! and notifies observers after every state change.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle -> InFlight -> Success ------------------> Idle (cursor advanced)
//!                  \-> Failure (transient) -> RetryScheduled -> InFlight
//!                  \-> Failure (permanent) -> Failed (until reset)
//! Idle with next_offset >= total_result_count  => Exhausted
//! ```
//!
//! ## Stale responses
//!
//! Every issued call carries a generation number and the offset it started at.
//! A completion is applied only if it belongs to the current in-flight call and
//! its offset still equals `next_offset`; anything else (a call superseded by a
//! forced trigger, a reset or a cancel) is dropped without notification.
//!
//! ## Threading
//!
//! Calls and retry timers run as tokio tasks; `trigger_next_page` must be called
//! from within a runtime. Observers run synchronously on the task that completed
//! the call, after the state lock is released, in registration order.
//! Deliveries are serialized: a `Reset` always reaches observers before the
//! result of the call the reset issued, even on a multi-threaded runtime.
//! Observers may trigger pages but must not call `reset_request`.

pub mod backoff;
pub mod call;
pub mod cursor;

pub use call::CallContext;
pub use cursor::{Cursor, LifecycleFlags, RequestSnapshot};

use futures_util::stream::{self, BoxStream, StreamExt};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::endpoint::Endpoint;
use crate::error::{GiphyError, GiphyResult};
use crate::metrics;
use crate::response::{Envelope, Page};
use backoff::backoff_delay;

/// Decodes a checked response body into a page. The third argument is the
/// offset the page was requested at.
pub type DecodeFn<T> = Arc<dyn Fn(&Value, &Envelope, u32) -> GiphyResult<Page<T>> + Send + Sync>;

type Observer<T> = Arc<dyn Fn(&RequestSnapshot, &RequestEvent<T>) + Send + Sync>;

/// What changed
#[derive(Debug, Clone, PartialEq)]
pub enum RequestEvent<T> {
    /// The request was reset
    Reset,
    /// A page decoded successfully
    Page(Page<T>),
    /// The call failed; a retry may be scheduled (see the snapshot)
    Failed(GiphyError),
}

/// Snapshot plus event, as delivered through [`PaginatedRequest::subscribe`]
#[derive(Debug, Clone, PartialEq)]
pub struct RequestUpdate<T> {
    /// State right after the change
    pub snapshot: RequestSnapshot,
    /// The change
    pub event: RequestEvent<T>,
}

impl<T> RequestUpdate<T> {
    /// Decoded page, if this update carries one
    pub fn page(&self) -> Option<&Page<T>> {
        match &self.event {
            RequestEvent::Page(page) => Some(page),
            _ => None,
        }
    }

    /// Failure, if this update carries one
    pub fn error(&self) -> Option<&GiphyError> {
        match &self.event {
            RequestEvent::Failed(err) => Some(err),
            _ => None,
        }
    }
}

struct InFlight {
    handle: JoinHandle<()>,
    offset: u32,
    generation: u64,
    started_at: Instant,
}

struct PendingRetry {
    id: u64,
    handle: JoinHandle<()>,
    delay: Duration,
}

struct State {
    cursor: Cursor,
    flags: LifecycleFlags,
    retry_count: u32,
    pending_retry: Option<PendingRetry>,
    in_flight: Option<InFlight>,
    generation: u64,
    retry_seq: u64,
    timeout: Option<Duration>,
}

impl State {
    fn snapshot(&self) -> RequestSnapshot {
        RequestSnapshot {
            cursor: self.cursor,
            flags: self.flags,
            retry_count: self.retry_count,
            next_retry_delay: self.pending_retry.as_ref().map(|r| r.delay),
        }
    }

    fn cancel_retry(&mut self) {
        if let Some(retry) = self.pending_retry.take() {
            retry.handle.abort();
        }
    }

    fn abort_all(&mut self) {
        self.cancel_retry();
        if let Some(call) = self.in_flight.take() {
            call.handle.abort();
        }
        self.flags.has_in_flight_request = false;
    }
}

struct Shared<T> {
    state: Mutex<State>,
    /// Held while a completion or reset is delivered to observers
    delivery: Mutex<()>,
    observers: Mutex<Vec<Observer<T>>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<RequestUpdate<T>>>>,
    template: Endpoint,
    decode: DecodeFn<T>,
    ctx: CallContext,
}

fn lock<S>(mutex: &Mutex<S>) -> MutexGuard<'_, S> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T> Shared<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn trigger(self: &Arc<Self>, force: bool) -> bool {
        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                error!(path = self.template.path(), "trigger_next_page called outside a tokio runtime");
                return false;
            }
        };

        let mut state = lock(&self.state);

        if force {
            state.cancel_retry();
            // The superseded call keeps running; its completion is dropped as stale
            state.in_flight = None;
            state.flags.has_in_flight_request = false;
        }

        if state.pending_retry.is_some()
            || state.in_flight.is_some()
            || state.cursor.is_exhausted()
            || (state.flags.has_terminal_failure && !force)
        {
            return false;
        }

        state.generation += 1;
        let generation = state.generation;
        let offset = state.cursor.next_offset;
        let limit = state.cursor.limit;
        let timeout = state.timeout;
        state.flags.has_in_flight_request = true;

        debug!(
            path = self.template.path(),
            offset,
            limit,
            retry_count = state.retry_count,
            "issuing page request"
        );

        let endpoint = self.template.with_page(offset, limit);
        let ctx = self.ctx.clone();
        let decode = Arc::clone(&self.decode);
        let weak = Arc::downgrade(self);

        let handle = runtime.spawn(async move {
            let result = match ctx.execute(&endpoint, timeout).await {
                Ok((envelope, root)) => decode(&root, &envelope, offset),
                Err(e) => Err(e),
            };
            if let Some(shared) = weak.upgrade() {
                shared.complete(generation, offset, result);
            }
        });

        state.in_flight = Some(InFlight {
            handle,
            offset,
            generation,
            started_at: Instant::now(),
        });
        true
    }

    fn complete(self: &Arc<Self>, generation: u64, offset: u32, result: GiphyResult<Page<T>>) {
        let _delivery = lock(&self.delivery);
        let (snapshot, event) = {
            let mut state = lock(&self.state);

            let current = matches!(
                &state.in_flight,
                Some(call) if call.generation == generation && call.offset == offset
            ) && state.cursor.next_offset == offset;

            if !current {
                debug!(path = self.template.path(), offset, "dropping stale response");
                metrics::record_stale_response();
                return;
            }

            let elapsed = state
                .in_flight
                .take()
                .map(|call| call.started_at.elapsed())
                .unwrap_or_default();
            state.flags.has_in_flight_request = false;

            let event = match result {
                Ok(page) => {
                    state.cancel_retry();
                    state.retry_count = 0;
                    state.flags.has_received_failure_since_last_response = false;
                    state.flags.has_terminal_failure = false;
                    state.flags.has_received_any_response = true;
                    if page.items.is_empty() {
                        state.flags.has_received_empty_response = true;
                    }
                    state.cursor.advance(&page.pagination, page.items.len());

                    debug!(
                        path = self.template.path(),
                        offset,
                        count = page.items.len(),
                        next_offset = state.cursor.next_offset,
                        total = state.cursor.total_result_count,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "page received"
                    );
                    RequestEvent::Page(page)
                }
                Err(err) => {
                    let kind = err.kind();
                    state.flags.has_received_failure_since_last_response = true;
                    metrics::record_failure(kind);

                    if kind.is_retryable() {
                        let delay = self.schedule_retry(&mut state);
                        warn!(
                            path = self.template.path(),
                            offset,
                            status = err.status_code(),
                            kind = %kind,
                            retry_count = state.retry_count,
                            delay_ms = delay.map(|d| d.as_millis() as u64),
                            "page request failed, retry scheduled"
                        );
                    } else {
                        state.flags.has_terminal_failure = true;
                        warn!(
                            path = self.template.path(),
                            offset,
                            status = err.status_code(),
                            kind = %kind,
                            "page request failed permanently"
                        );
                    }
                    RequestEvent::Failed(err)
                }
            };

            (state.snapshot(), event)
        };

        self.notify(&snapshot, event);
    }

    /// Returns the delay of the newly scheduled retry, or `None` if one was
    /// already pending.
    fn schedule_retry(self: &Arc<Self>, state: &mut State) -> Option<Duration> {
        if state.pending_retry.is_some() {
            return None;
        }
        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                error!(path = self.template.path(), "cannot schedule retry outside a tokio runtime");
                return None;
            }
        };

        state.retry_count += 1;
        let delay = backoff_delay(state.retry_count);
        state.retry_seq += 1;
        let id = state.retry_seq;

        let weak: Weak<Self> = Arc::downgrade(self);
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(shared) = weak.upgrade() {
                shared.fire_retry(id);
            }
        });

        state.pending_retry = Some(PendingRetry { id, handle, delay });
        metrics::record_retry_backoff(delay);
        Some(delay)
    }

    fn fire_retry(self: &Arc<Self>, id: u64) {
        {
            let mut state = lock(&self.state);
            match &state.pending_retry {
                Some(retry) if retry.id == id => state.pending_retry = None,
                _ => return,
            }
        }
        self.trigger(false);
    }

    fn notify(&self, snapshot: &RequestSnapshot, event: RequestEvent<T>) {
        let observers: Vec<Observer<T>> = lock(&self.observers).clone();
        for observer in &observers {
            observer(snapshot, &event);
        }

        let mut subscribers = lock(&self.subscribers);
        subscribers.retain(|tx| {
            tx.send(RequestUpdate {
                snapshot: *snapshot,
                event: event.clone(),
            })
            .is_ok()
        });
    }
}

/// Stateful, retrying, paginated request over one endpoint.
///
/// Dropping the request cancels its in-flight call and pending retry.
pub struct PaginatedRequest<T> {
    shared: Arc<Shared<T>>,
}

impl<T> PaginatedRequest<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an idle request. Nothing is sent until
    /// [`trigger_next_page`](Self::trigger_next_page).
    pub fn new<F>(ctx: CallContext, template: Endpoint, cursor: Cursor, decode: F) -> Self
    where
        F: Fn(&Value, &Envelope, u32) -> GiphyResult<Page<T>> + Send + Sync + 'static,
    {
        let state = State {
            cursor,
            flags: LifecycleFlags::default(),
            retry_count: 0,
            pending_retry: None,
            in_flight: None,
            generation: 0,
            retry_seq: 0,
            timeout: None,
        };
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                delivery: Mutex::new(()),
                observers: Mutex::new(Vec::new()),
                subscribers: Mutex::new(Vec::new()),
                template,
                decode: Arc::new(decode),
                ctx,
            }),
        }
    }

    /// Override the per-call timeout for this request
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.set_timeout(Some(timeout));
        self
    }

    /// Set or clear the per-call timeout; applies to calls issued afterwards
    pub fn set_timeout(&self, timeout: Option<Duration>) {
        lock(&self.shared.state).timeout = timeout;
    }

    /// Request the next page.
    ///
    /// Returns `true` if a call was issued. Returns `false` when a retry is
    /// pending, a call is already in flight, all pages were fetched, or a
    /// permanent failure stopped the request. `force` first cancels the pending
    /// retry and forgets the in-flight call, and overrides a permanent failure.
    pub fn trigger_next_page(&self, force: bool) -> bool {
        self.shared.trigger(force)
    }

    /// Rewind to offset 0, clear all flags and retry state, and immediately
    /// request the first page. With `fire_immediately`, observers get a
    /// [`RequestEvent::Reset`] carrying the rewound state before the new call
    /// resolves.
    pub fn reset_request(&self, fire_immediately: bool) -> bool {
        // Completions wait here until the reset has been delivered
        let _delivery = lock(&self.shared.delivery);
        {
            let mut state = lock(&self.shared.state);
            state.cancel_retry();
            state.cursor.reset();
            state.flags = LifecycleFlags::default();
            state.retry_count = 0;
            state.in_flight = None;
        }
        info!(path = self.shared.template.path(), "request reset");

        let started = self.shared.trigger(true);
        if fire_immediately {
            let snapshot = lock(&self.shared.state).snapshot();
            self.shared.notify(&snapshot, RequestEvent::Reset);
        }
        started
    }

    /// Abort the in-flight call and the pending retry. No notification fires.
    pub fn cancel(&self) {
        lock(&self.shared.state).abort_all();
    }

    /// Current state
    pub fn snapshot(&self) -> RequestSnapshot {
        lock(&self.shared.state).snapshot()
    }

    /// Register an observer, called after every change in registration order
    pub fn on_update<F>(&self, observer: F)
    where
        F: Fn(&RequestSnapshot, &RequestEvent<T>) + Send + Sync + 'static,
    {
        lock(&self.shared.observers).push(Arc::new(observer));
    }

    /// Stream of every subsequent update. Ends when the request is dropped.
    pub fn subscribe(&self) -> BoxStream<'static, RequestUpdate<T>> {
        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.shared.subscribers).push(tx);
        stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|update| (update, rx)) })
            .boxed()
    }

    /// Endpoint template this request pages through
    pub fn endpoint(&self) -> &Endpoint {
        &self.shared.template
    }
}

impl<T> Drop for PaginatedRequest<T> {
    fn drop(&mut self) {
        lock(&self.shared.state).abort_all();
    }
}

impl<T> std::fmt::Debug for PaginatedRequest<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = lock(&self.shared.state).snapshot();
        f.debug_struct("PaginatedRequest")
            .field("path", &self.shared.template.path())
            .field("snapshot", &snapshot)
            .finish()
    }
}
