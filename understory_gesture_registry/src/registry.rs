// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dispatch registry.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;
use understory_gesture::recognizer::{self, Cx, Listen, Recognizer, Scheduler, TimerTag};
use understory_gesture::{Edge, GestureConfig, GestureEvent, NativeEvent, NativeEventBridge};
use understory_timing::{Millis, TimerQueue, TimerToken};

use crate::error::RegistryError;
use crate::listener::{Delivery, Listener, ListenerId};
use crate::names::{EventName, EventSpec, parse_event_names};
use crate::target::{HostGeometry, Target, TargetHost, TargetId};

/// Identifies one binding in a [`DispatchRegistry`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

/// Deduplication key of a binding.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BindingKey {
    /// The element.
    pub target: TargetId,
    /// The event or gesture.
    pub name: EventName,
    /// The listener's identity.
    pub listener: ListenerId,
    /// Whether the binding is for the capture phase.
    pub capture: bool,
}

/// Handle to the bindings made by one `add` call.
///
/// A call that names several events or resolves to several elements makes one
/// binding per (element, event) pair; the handle covers all of them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registration {
    entries: SmallVec<[EntryId; 2]>,
}

impl Registration {
    /// The bindings covered by this handle.
    #[must_use]
    pub fn entries(&self) -> &[EntryId] {
        &self.entries
    }

    /// Returns `true` if the handle covers more than one binding.
    #[must_use]
    pub fn is_batch(&self) -> bool {
        self.entries.len() > 1
    }

    fn push(&mut self, id: EntryId) {
        if !self.entries.contains(&id) {
            self.entries.push(id);
        }
    }
}

#[derive(Debug)]
enum Binding {
    Native { attached: bool },
    Gesture(Box<dyn Recognizer>),
}

#[derive(Debug)]
struct Entry {
    key: BindingKey,
    listener: Listener,
    binding: Binding,
}

/// Timers of one entry, multiplexed onto the registry's queue.
struct EntryScheduler<'a> {
    timers: &'a mut TimerQueue<(EntryId, TimerTag)>,
    entry: EntryId,
}

impl Scheduler for EntryScheduler<'_> {
    fn schedule(&mut self, deadline: Millis, period: Option<Millis>, tag: TimerTag) -> TimerToken {
        let payload = (self.entry, tag);
        match period {
            Some(period) => self.timers.schedule_repeating(deadline, 0, period, payload),
            None => self.timers.schedule_at(deadline, payload),
        }
    }

    fn cancel(&mut self, token: TimerToken) {
        self.timers.cancel(token);
    }
}

enum Pending {
    Native(Listener, TargetId),
    Gesture(Listener, TargetId, GestureEvent),
}

/// Binds (target, event, listener, options) tuples to recognizers and routes
/// host events and timers through them.
///
/// The registry owns every recognizer it creates. The host calls
/// [`dispatch`](Self::dispatch) for each native event and
/// [`advance`](Self::advance) when [`next_deadline`](Self::next_deadline)
/// comes due. Listeners run synchronously, after all recognizers have seen
/// the event, and must not call back into the registry.
#[derive(Debug, Default)]
pub struct DispatchRegistry {
    bridge: NativeEventBridge,
    entries: BTreeMap<EntryId, Entry>,
    keys: HashMap<BindingKey, EntryId>,
    /// Entries taken out by `detach`, kept for `reattach`.
    detached: BTreeMap<EntryId, Entry>,
    timers: TimerQueue<(EntryId, TimerTag)>,
    next_id: u64,
}

impl DispatchRegistry {
    /// Creates a registry normalizing input with `bridge`.
    #[must_use]
    pub fn new(bridge: NativeEventBridge) -> Self {
        Self {
            bridge,
            ..Self::default()
        }
    }

    /// The native event bridge.
    #[must_use]
    pub fn bridge(&self) -> &NativeEventBridge {
        &self.bridge
    }

    /// The native event bridge, mutably.
    pub fn bridge_mut(&mut self) -> &mut NativeEventBridge {
        &mut self.bridge
    }

    /// Number of registered bindings. Detached bindings are not counted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The key of a registered binding.
    #[must_use]
    pub fn key(&self, id: EntryId) -> Option<&BindingKey> {
        self.entries.get(&id).map(|e| &e.key)
    }

    /// Whether a binding is registered and currently receives events.
    #[must_use]
    pub fn is_attached(&self, id: EntryId) -> bool {
        self.entries.get(&id).is_some_and(|e| match &e.binding {
            Binding::Native { attached } => *attached,
            Binding::Gesture(r) => r.is_attached(),
        })
    }

    /// The earliest pending timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    /// Binds `names` on `target` to `listener`.
    ///
    /// Invalid input is logged at error level and has no effect.
    pub fn add(
        &mut self,
        host: &dyn TargetHost,
        target: impl Into<Target>,
        names: &str,
        listener: &Listener,
        config: &GestureConfig,
    ) -> Option<Registration> {
        self.try_add(host, target, names, listener, config)
            .map_err(|err| tracing::error!(%err, names, "registration failed"))
            .ok()
    }

    /// Binds `names` on `target` to `listener`, reporting invalid input.
    ///
    /// Adding a binding whose key already exists returns the existing binding.
    /// A detached binding with that key is re-attached instead of replaced.
    pub fn try_add(
        &mut self,
        host: &dyn TargetHost,
        target: impl Into<Target>,
        names: &str,
        listener: &Listener,
        config: &GestureConfig,
    ) -> Result<Registration, RegistryError> {
        let targets = target.into().resolve(host)?;
        let names = parse_event_names(names)?;
        let mut registration = Registration::default();
        for &target in &targets {
            for name in &names {
                for key in self.keys_for(target, name, listener, config) {
                    let id = self.bind(key, name, listener, config);
                    registration.push(id);
                }
            }
        }
        Ok(registration)
    }

    /// Like [`add`](Self::add), with options given as `(name, value)` pairs.
    pub fn add_with_options<'a>(
        &mut self,
        host: &dyn TargetHost,
        target: impl Into<Target>,
        names: &str,
        listener: &Listener,
        options: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Option<Registration> {
        GestureConfig::from_options(options)
            .map_err(RegistryError::from)
            .and_then(|config| self.try_add(host, target, names, listener, &config))
            .map_err(|err| tracing::error!(%err, names, "registration failed"))
            .ok()
    }

    /// Registers every entry of `spec` on `target`.
    ///
    /// Each entry's options are layered over `shared`. Invalid input is
    /// logged at error level and has no effect.
    pub fn add_bulk(
        &mut self,
        host: &dyn TargetHost,
        target: impl Into<Target>,
        spec: &EventSpec,
        shared: &GestureConfig,
    ) -> Option<Registration> {
        self.try_add_bulk(host, target, spec, shared)
            .map_err(|err| tracing::error!(%err, "bulk registration failed"))
            .ok()
    }

    /// Registers every entry of `spec` on `target`, reporting invalid input.
    ///
    /// Nothing is registered unless every entry is valid.
    pub fn try_add_bulk(
        &mut self,
        host: &dyn TargetHost,
        target: impl Into<Target>,
        spec: &EventSpec,
        shared: &GestureConfig,
    ) -> Result<Registration, RegistryError> {
        if spec.is_empty() {
            return Err(RegistryError::EmptySpec);
        }
        let targets = target.into().resolve(host)?;
        let mut parsed = Vec::with_capacity(spec.len());
        for entry in spec.entries() {
            let config = match &entry.config {
                Some(own) => shared.merged(own),
                None => shared.clone(),
            };
            parsed.push((parse_event_names(&entry.names)?, &entry.listener, config));
        }
        let mut registration = Registration::default();
        for (names, listener, config) in &parsed {
            for name in names {
                for &target in &targets {
                    for key in self.keys_for(target, name, listener, config) {
                        let id = self.bind(key, name, listener, config);
                        registration.push(id);
                    }
                }
            }
        }
        Ok(registration)
    }

    /// Removes the bindings an `add` with the same arguments would make.
    ///
    /// Returns the number of bindings removed. Invalid input is logged at
    /// error level and removes nothing.
    pub fn remove(
        &mut self,
        host: &dyn TargetHost,
        target: impl Into<Target>,
        names: &str,
        listener: &Listener,
        config: &GestureConfig,
    ) -> usize {
        let resolved = target
            .into()
            .resolve(host)
            .and_then(|targets| Ok((targets, parse_event_names(names)?)));
        let (targets, names) = match resolved {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::error!(%err, names, "removal failed");
                return 0;
            }
        };
        let mut removed = 0;
        for &target in &targets {
            for name in &names {
                for key in self.keys_for(target, name, listener, config) {
                    if let Some(id) = self.keys.remove(&key) {
                        self.discard(id);
                        removed += 1;
                    }
                    let parked = self.detached.len();
                    self.detached.retain(|_, entry| entry.key != key);
                    removed += parked - self.detached.len();
                }
            }
        }
        removed
    }

    /// Takes the bindings of `registration` out of the registry.
    ///
    /// Recognizers drop their session state and timers, and the bindings stop
    /// counting toward [`len`](Self::len). They are kept aside so that
    /// [`reattach`](Self::reattach) or a repeated `add` can restore them; use
    /// [`remove_registration`](Self::remove_registration) to delete them.
    /// Calling this more than once has no further effect.
    pub fn detach(&mut self, registration: &Registration) {
        for &id in registration.entries() {
            let Some(mut entry) = self.entries.remove(&id) else {
                continue;
            };
            match &mut entry.binding {
                Binding::Native { attached } => *attached = false,
                Binding::Gesture(recognizer) => {
                    let mut scheduler = EntryScheduler {
                        timers: &mut self.timers,
                        entry: id,
                    };
                    recognizer.detach(&mut scheduler);
                }
            }
            self.timers.retain(|&(owner, _)| owner != id);
            self.keys.remove(&entry.key);
            self.detached.insert(id, entry);
        }
    }

    /// Puts bindings taken out by [`detach`](Self::detach) back.
    ///
    /// A binding whose key was registered again in the meantime is dropped in
    /// favor of the newer one.
    pub fn reattach(&mut self, registration: &Registration) {
        for &id in registration.entries() {
            self.restore(id);
        }
    }

    /// Deletes the bindings of `registration`, attached or detached.
    ///
    /// Returns the number of bindings deleted.
    pub fn remove_registration(&mut self, registration: &Registration) -> usize {
        let mut removed = 0;
        for &id in registration.entries() {
            if self.entries.contains_key(&id) {
                self.discard(id);
                removed += 1;
            } else if self.detached.remove(&id).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Drops move and up listening of the gestures in `registration`.
    pub fn pause(&mut self, registration: &Registration) {
        self.for_each_entry(registration, |entry, _| {
            if let Binding::Gesture(recognizer) = &mut entry.binding {
                recognizer.pause();
            }
        });
    }

    /// Restores listening dropped by [`pause`](Self::pause).
    pub fn resume(&mut self, registration: &Registration) {
        self.for_each_entry(registration, |entry, _| {
            if let Binding::Gesture(recognizer) = &mut entry.binding {
                recognizer.resume();
            }
        });
    }

    /// Stops drag frame coalescing and pauses the gestures in `registration`.
    pub fn cancel(&mut self, registration: &Registration) {
        self.for_each_entry(registration, |entry, scheduler| {
            if let Binding::Gesture(recognizer) = &mut entry.binding {
                recognizer.cancel(scheduler);
            }
        });
    }

    /// Removes every binding.
    pub fn remove_all(&mut self) {
        let ids: Vec<EntryId> = self.entries.keys().copied().collect();
        for id in ids {
            self.discard(id);
        }
        self.keys.clear();
        self.detached.clear();
        self.timers.clear();
    }

    /// Routes one host event that occurred on `target`.
    ///
    /// Native bindings on `target` for the event's type receive it as is.
    /// Gesture bindings on `target` receive the normalized input; gestures
    /// with a session in progress also receive moves and ups from any target.
    /// Returns the number of listener calls made.
    pub fn dispatch(
        &mut self,
        target: TargetId,
        event: &NativeEvent,
        host: &dyn TargetHost,
    ) -> usize {
        let input = self.bridge.normalize(event);
        let mut pending = Vec::new();
        for (&id, entry) in &mut self.entries {
            match &mut entry.binding {
                Binding::Native { attached } => {
                    let same_type =
                        matches!(&entry.key.name, EventName::Native(ty) if *ty == event.ty);
                    if *attached && same_type && entry.key.target == target {
                        pending.push(Pending::Native(entry.listener.clone(), target));
                    }
                }
                Binding::Gesture(recognizer) => {
                    let Some(input) = &input else {
                        continue;
                    };
                    if !recognizer.accepts(input.edge) {
                        continue;
                    }
                    let document = matches!(input.edge, Edge::Move | Edge::Up)
                        && recognizer.listening().contains(Listen::DOCUMENT);
                    if entry.key.target != target && !document {
                        continue;
                    }
                    let geometry = HostGeometry::new(host, entry.key.target);
                    let mut scheduler = EntryScheduler {
                        timers: &mut self.timers,
                        entry: id,
                    };
                    let mut events = Vec::new();
                    let mut cx = Cx::new(input.time, &mut scheduler, &geometry, &mut events);
                    recognizer.on_input(input, &mut cx);
                    pending.extend(events.into_iter().map(|e| {
                        Pending::Gesture(entry.listener.clone(), entry.key.target, e)
                    }));
                }
            }
        }
        deliver(pending, Some(event))
    }

    /// Fires every timer due at `now`.
    ///
    /// Returns the number of listener calls made.
    pub fn advance(&mut self, now: Millis, host: &dyn TargetHost) -> usize {
        let mut pending = Vec::new();
        while let Some(fired) = self.timers.pop_due(now) {
            let (id, tag) = fired.payload;
            let Some(entry) = self.entries.get_mut(&id) else {
                continue;
            };
            let Binding::Gesture(recognizer) = &mut entry.binding else {
                continue;
            };
            let geometry = HostGeometry::new(host, entry.key.target);
            let mut scheduler = EntryScheduler {
                timers: &mut self.timers,
                entry: id,
            };
            let mut events = Vec::new();
            let mut cx = Cx::new(fired.deadline, &mut scheduler, &geometry, &mut events);
            recognizer.on_timer(tag, &mut cx);
            pending.extend(
                events
                    .into_iter()
                    .map(|e| Pending::Gesture(entry.listener.clone(), entry.key.target, e)),
            );
        }
        deliver(pending, None)
    }

    /// Keys an `add` of `name` would bind, one per native family after
    /// fan-out.
    fn keys_for(
        &self,
        target: TargetId,
        name: &EventName,
        listener: &Listener,
        config: &GestureConfig,
    ) -> SmallVec<[BindingKey; 4]> {
        let key = |name: EventName| BindingKey {
            target,
            name,
            listener: listener.id(),
            capture: config.use_capture,
        };
        match name {
            EventName::Gesture(_) => smallvec::smallvec![key(name.clone())],
            EventName::Native(ty) => self
                .bridge
                .expand_event_names(ty.name(), config.strict)
                .into_iter()
                .map(|ty| key(EventName::Native(ty)))
                .collect(),
        }
    }

    fn bind(
        &mut self,
        key: BindingKey,
        name: &EventName,
        listener: &Listener,
        config: &GestureConfig,
    ) -> EntryId {
        if let Some(&id) = self.keys.get(&key) {
            tracing::trace!(name = %key.name, target = %key.target, "existing binding reused");
            return id;
        }
        let parked = self
            .detached
            .iter()
            .find_map(|(&id, entry)| (entry.key == key).then_some(id));
        if let Some(id) = parked {
            self.restore(id);
            return id;
        }
        let id = EntryId(self.next_id);
        self.next_id += 1;
        let binding = match name {
            EventName::Gesture(kind) => Binding::Gesture(recognizer::build(*kind, config)),
            EventName::Native(_) => Binding::Native { attached: true },
        };
        tracing::debug!(name = %key.name, target = %key.target, "binding added");
        self.keys.insert(key.clone(), id);
        self.entries.insert(
            id,
            Entry {
                key,
                listener: listener.clone(),
                binding,
            },
        );
        id
    }

    fn restore(&mut self, id: EntryId) {
        let Some(mut entry) = self.detached.remove(&id) else {
            return;
        };
        if self.keys.contains_key(&entry.key) {
            tracing::debug!(
                name = %entry.key.name,
                target = %entry.key.target,
                "detached binding superseded"
            );
            return;
        }
        match &mut entry.binding {
            Binding::Native { attached } => *attached = true,
            Binding::Gesture(recognizer) => recognizer.attach(),
        }
        tracing::debug!(
            name = %entry.key.name,
            target = %entry.key.target,
            "binding reattached"
        );
        self.keys.insert(entry.key.clone(), id);
        self.entries.insert(id, entry);
    }

    fn discard(&mut self, id: EntryId) {
        let Some(mut entry) = self.entries.remove(&id) else {
            return;
        };
        if let Binding::Gesture(recognizer) = &mut entry.binding {
            let mut scheduler = EntryScheduler {
                timers: &mut self.timers,
                entry: id,
            };
            recognizer.detach(&mut scheduler);
        }
        self.timers.retain(|&(owner, _)| owner != id);
        self.keys.remove(&entry.key);
    }

    fn for_each_entry(
        &mut self,
        registration: &Registration,
        mut f: impl FnMut(&mut Entry, &mut dyn Scheduler),
    ) {
        for &id in registration.entries() {
            if let Some(entry) = self.entries.get_mut(&id) {
                let mut scheduler = EntryScheduler {
                    timers: &mut self.timers,
                    entry: id,
                };
                f(entry, &mut scheduler);
            }
        }
    }
}

fn deliver(pending: Vec<Pending>, native: Option<&NativeEvent>) -> usize {
    let calls = pending.len();
    for item in pending {
        match item {
            Pending::Native(listener, target) => {
                if let Some(event) = native {
                    listener.call(&Delivery::Native { target, event });
                }
            }
            Pending::Gesture(listener, target, event) => {
                listener.call(&Delivery::Gesture {
                    target,
                    event: &event,
                    native,
                });
            }
        }
    }
    calls
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::string::String;
    use core::cell::RefCell;
    use kurbo::Rect;
    use understory_gesture::geometry::BoundingBox;

    struct Board;

    impl TargetHost for Board {
        fn query_selector_all(&self, selector: &str) -> Vec<TargetId> {
            match selector {
                ".cell" => alloc::vec![TargetId(1), TargetId(2)],
                "#one" => alloc::vec![TargetId(1)],
                _ => Vec::new(),
            }
        }

        fn bounding_box(&self, target: TargetId) -> BoundingBox {
            let x = 100.0 * (target.0 as f64 - 1.0);
            BoundingBox::new(Rect::new(x, 0.0, x + 100.0, 100.0))
        }
    }

    fn recorder() -> (Listener, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let listener = Listener::new(move |d| {
            let line = match d.gesture() {
                Some(e) => alloc::format!("{}:{}@{}", e.kind, e.phase, d.target()),
                None => alloc::format!("native@{}", d.target()),
            };
            sink.borrow_mut().push(line);
        });
        (listener, log)
    }

    fn click(reg: &mut DispatchRegistry, target: TargetId, t: Millis, x: f64) {
        reg.dispatch(target, &NativeEvent::new("mousedown", t, (x, 50.0)), &Board);
        reg.dispatch(target, &NativeEvent::new("mouseup", t + 50, (x, 50.0)), &Board);
    }

    #[test]
    fn duplicate_add_is_one_binding() {
        let mut reg = DispatchRegistry::default();
        let (listener, _) = recorder();
        let config = GestureConfig::new();
        let a = reg.add(&Board, TargetId(1), "tap", &listener, &config).unwrap();
        let b = reg.add(&Board, TargetId(1), "tap", &listener, &config).unwrap();
        assert_eq!(a, b);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.remove(&Board, TargetId(1), "tap", &listener, &config), 1);
        assert!(reg.is_empty());
    }

    #[test]
    fn selector_fans_out_per_element() {
        let mut reg = DispatchRegistry::default();
        let (listener, log) = recorder();
        let batch = reg
            .add(&Board, ".cell", "click", &listener, &GestureConfig::new())
            .unwrap();
        assert!(batch.is_batch());
        click(&mut reg, TargetId(2), 0, 150.0);
        assert_eq!(*log.borrow(), ["click:click@#2"]);
    }

    #[test]
    fn invalid_input_has_no_effect() {
        let mut reg = DispatchRegistry::default();
        let (listener, _) = recorder();
        let config = GestureConfig::new();
        assert!(reg.add(&Board, ".nothing", "tap", &listener, &config).is_none());
        assert!(reg.add(&Board, TargetId(1), " ", &listener, &config).is_none());
        assert!(
            reg.add_with_options(&Board, TargetId(1), "tap", &listener, [("timeout", "soon")])
                .is_none()
        );
        assert!(reg.is_empty());
    }

    #[test]
    fn native_names_fan_out_unless_strict() {
        let mut reg = DispatchRegistry::default();
        let (listener, log) = recorder();
        let fanned = reg
            .add(&Board, TargetId(1), "onmousedown", &listener, &GestureConfig::new())
            .unwrap();
        // Mouse and touch are supported by default.
        assert_eq!(fanned.entries().len(), 2);
        let strict = reg
            .add(&Board, TargetId(2), "mousedown", &listener, &GestureConfig::new().strict(true))
            .unwrap();
        assert_eq!(strict.entries().len(), 1);

        reg.dispatch(TargetId(1), &NativeEvent::new("mousedown", 0, (5.0, 5.0)), &Board);
        reg.dispatch(TargetId(2), &NativeEvent::new("mousedown", 0, (105.0, 5.0)), &Board);
        assert_eq!(*log.borrow(), ["native@#1", "native@#2"]);
    }

    #[test]
    fn detach_then_add_reactivates_gesture() {
        let mut reg = DispatchRegistry::default();
        let (listener, log) = recorder();
        let config = GestureConfig::new();
        let handle = reg.add(&Board, TargetId(1), "click", &listener, &config).unwrap();
        reg.detach(&handle);
        reg.detach(&handle);
        click(&mut reg, TargetId(1), 0, 50.0);
        assert!(log.borrow().is_empty());
        assert!(reg.is_empty());
        assert!(reg.key(handle.entries()[0]).is_none());
        assert!(!reg.is_attached(handle.entries()[0]));

        let again = reg.add(&Board, TargetId(1), "click", &listener, &config).unwrap();
        assert_eq!(again, handle);
        click(&mut reg, TargetId(1), 200, 50.0);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn remove_by_handle_after_duplicate_add() {
        let mut reg = DispatchRegistry::default();
        let (listener, log) = recorder();
        let config = GestureConfig::new();
        let a = reg.add(&Board, TargetId(1), "tap", &listener, &config).unwrap();
        let b = reg.add(&Board, TargetId(1), "tap", &listener, &config).unwrap();
        assert_eq!(reg.len(), 1);

        assert_eq!(reg.remove_registration(&a), 1);
        assert!(reg.is_empty());
        assert_eq!(reg.remove_registration(&b), 0);
        click(&mut reg, TargetId(1), 0, 50.0);
        assert!(log.borrow().is_empty());

        let c = reg.add(&Board, TargetId(1), "tap", &listener, &config).unwrap();
        assert_ne!(c, a);
        reg.detach(&c);
        assert_eq!(reg.remove_registration(&c), 1);
        reg.reattach(&c);
        assert!(reg.is_empty());
    }

    #[test]
    fn reattach_restores_detached_bindings() {
        let mut reg = DispatchRegistry::default();
        let (listener, log) = recorder();
        let handle = reg
            .add(&Board, ".cell", "click mousedown", &listener, &GestureConfig::new().strict(true))
            .unwrap();
        assert_eq!(reg.len(), 4);
        reg.detach(&handle);
        assert!(reg.is_empty());

        reg.reattach(&handle);
        reg.reattach(&handle);
        assert_eq!(reg.len(), 4);
        assert!(handle.entries().iter().all(|&id| reg.is_attached(id)));
        click(&mut reg, TargetId(2), 0, 150.0);
        assert_eq!(*log.borrow(), ["native@#2", "click:click@#2"]);
    }

    #[test]
    fn bulk_merges_shared_and_own_options() {
        let mut reg = DispatchRegistry::default();
        let (taps, log) = recorder();
        let (presses, _) = recorder();
        let spec = EventSpec::new()
            .on("tap", taps)
            .on_with("longpress", presses, GestureConfig::new().delay(100));
        let handle = reg
            .add_bulk(&Board, "#one", &spec, &GestureConfig::new().timeout(1000))
            .unwrap();
        assert_eq!(handle.entries().len(), 2);

        // A 600 ms press is a tap only because of the shared timeout.
        reg.dispatch(TargetId(1), &NativeEvent::new("mousedown", 0, (50.0, 50.0)), &Board);
        assert_eq!(reg.next_deadline(), Some(100));
        reg.advance(100, &Board);
        reg.dispatch(TargetId(1), &NativeEvent::new("mouseup", 600, (50.0, 50.0)), &Board);
        assert_eq!(*log.borrow(), ["tap:tap@#1"]);
    }

    #[test]
    fn drag_follows_contact_off_target() {
        let mut reg = DispatchRegistry::default();
        let (listener, log) = recorder();
        reg.add(&Board, TargetId(1), "drag", &listener, &GestureConfig::new())
            .unwrap();
        reg.dispatch(TargetId(1), &NativeEvent::new("mousedown", 0, (50.0, 50.0)), &Board);
        reg.dispatch(TargetId(2), &NativeEvent::new("mousemove", 16, (150.0, 50.0)), &Board);
        reg.dispatch(TargetId(2), &NativeEvent::new("mouseup", 32, (150.0, 50.0)), &Board);
        reg.dispatch(TargetId(2), &NativeEvent::new("mousemove", 48, (160.0, 50.0)), &Board);
        assert_eq!(
            *log.borrow(),
            ["drag:down@#1", "drag:move@#1", "drag:up@#1"]
        );
    }

    #[test]
    fn remove_all_cancels_timers() {
        let mut reg = DispatchRegistry::default();
        let (listener, log) = recorder();
        reg.add(&Board, TargetId(1), "longpress hover", &listener, &GestureConfig::new())
            .unwrap();
        reg.dispatch(TargetId(1), &NativeEvent::new("mousedown", 0, (50.0, 50.0)), &Board);
        assert!(reg.next_deadline().is_some());
        reg.remove_all();
        assert!(reg.is_empty());
        assert_eq!(reg.next_deadline(), None);
        assert_eq!(reg.advance(10_000, &Board), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn pause_drops_moves_until_resume() {
        let mut reg = DispatchRegistry::default();
        let (listener, log) = recorder();
        let handle = reg
            .add(&Board, TargetId(1), "drag", &listener, &GestureConfig::new())
            .unwrap();
        reg.dispatch(TargetId(1), &NativeEvent::new("mousedown", 0, (10.0, 10.0)), &Board);
        reg.pause(&handle);
        reg.dispatch(TargetId(1), &NativeEvent::new("mousemove", 10, (20.0, 10.0)), &Board);
        reg.resume(&handle);
        reg.dispatch(TargetId(1), &NativeEvent::new("mousemove", 20, (30.0, 10.0)), &Board);
        assert_eq!(*log.borrow(), ["drag:down@#1", "drag:move@#1"]);
    }
}
