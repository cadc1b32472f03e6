//! Trailing-edge debounce: only the latest scheduled task within the delay runs.

use std::time::Duration;

/// Runs a task once after a delay, with a way to call it off.
pub trait Scheduler {
	/// Token returned by `schedule`, consumed by `cancel`.
	type Handle;

	/// Arranges for `task` to run once `delay` has passed.
	fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle;

	/// Cancelling a handle whose task already ran is a no-op.
	fn cancel(&self, handle: Self::Handle);
}

/// Holds at most one pending task; scheduling again cancels the previous one.
pub struct Debouncer<S: Scheduler> {
	scheduler: S,
	pending: Option<S::Handle>,
}

impl<S: Scheduler> Debouncer<S> {
	/// Debouncer with nothing pending.
	pub fn new(scheduler: S) -> Self {
		Self {
			scheduler,
			pending: None,
		}
	}

	/// Replaces any pending task with `task`, due after `delay`.
	pub fn schedule(&mut self, delay: Duration, task: impl FnOnce() + 'static) {
		self.cancel();
		self.pending = Some(self.scheduler.schedule(delay, Box::new(task)));
	}

	/// Drops the pending task, if any.
	pub fn cancel(&mut self) {
		if let Some(handle) = self.pending.take() {
			self.scheduler.cancel(handle);
		}
	}
}

#[cfg(test)]
pub(crate) mod fake {
	use std::cell::RefCell;
	use std::rc::Rc;
	use std::time::Duration;

	use super::Scheduler;

	struct Entry {
		id: usize,
		due: Duration,
		task: Option<Box<dyn FnOnce()>>,
	}

	#[derive(Default)]
	struct Inner {
		now: Duration,
		next_id: usize,
		entries: Vec<Entry>,
	}

	/// Manual clock: tasks run only when [`ManualScheduler::advance`] passes their due time.
	#[derive(Clone, Default)]
	pub struct ManualScheduler(Rc<RefCell<Inner>>);

	impl ManualScheduler {
		pub fn advance(&self, by: Duration) {
			let due: Vec<Box<dyn FnOnce()>> = {
				let mut inner = self.0.borrow_mut();
				inner.now += by;
				let now = inner.now;
				inner
					.entries
					.iter_mut()
					.filter(|e| e.due <= now)
					.filter_map(|e| e.task.take())
					.collect()
			};
			for task in due {
				task();
			}
		}

		pub fn pending(&self) -> usize {
			self.0.borrow().entries.iter().filter(|e| e.task.is_some()).count()
		}
	}

	impl Scheduler for ManualScheduler {
		type Handle = usize;

		fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> usize {
			let mut inner = self.0.borrow_mut();
			let id = inner.next_id;
			inner.next_id += 1;
			let due = inner.now + delay;
			inner.entries.push(Entry {
				id,
				due,
				task: Some(task),
			});
			id
		}

		fn cancel(&self, handle: usize) {
			if let Some(entry) = self.0.borrow_mut().entries.iter_mut().find(|e| e.id == handle) {
				entry.task = None;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;
	use std::rc::Rc;
	use std::time::Duration;

	use super::fake::ManualScheduler;
	use super::*;

	#[test]
	fn only_latest_request_fires() {
		let clock = ManualScheduler::default();
		let mut debouncer = Debouncer::new(clock.clone());
		let fired = Rc::new(Cell::new(0));

		for value in 1..=3 {
			let fired = fired.clone();
			debouncer.schedule(Duration::from_millis(1200), move || fired.set(value));
			clock.advance(Duration::from_millis(500));
		}
		assert_eq!(fired.get(), 0);
		assert_eq!(clock.pending(), 1);

		clock.advance(Duration::from_millis(700));
		assert_eq!(fired.get(), 3);
		assert_eq!(clock.pending(), 0);
	}

	#[test]
	fn shorter_delay_replaces_longer_one() {
		let clock = ManualScheduler::default();
		let mut debouncer = Debouncer::new(clock.clone());
		let fired = Rc::new(Cell::new(""));

		let f = fired.clone();
		debouncer.schedule(Duration::from_millis(1200), move || f.set("edit"));
		let f = fired.clone();
		debouncer.schedule(Duration::from_millis(400), move || f.set("import"));

		clock.advance(Duration::from_millis(400));
		assert_eq!(fired.get(), "import");
		clock.advance(Duration::from_millis(2000));
		assert_eq!(fired.get(), "import");
	}

	#[test]
	fn cancel_drops_pending_task() {
		let clock = ManualScheduler::default();
		let mut debouncer = Debouncer::new(clock.clone());
		let fired = Rc::new(Cell::new(false));
		let f = fired.clone();
		debouncer.schedule(Duration::from_millis(100), move || f.set(true));
		debouncer.cancel();
		clock.advance(Duration::from_secs(1));
		assert!(!fired.get());
	}
}
