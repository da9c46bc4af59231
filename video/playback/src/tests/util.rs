use std::cell::RefCell;
use std::rc::Rc;

use crate::util::Mailbox;
use crate::{
	clamp_time, clamp_unit, contiguous_buffered_fraction, format_time, progress_percent, snap_playback_rate, TimeRange,
};

#[test]
fn test_format_time() {
	assert_eq!(format_time(0.0), "0:00");
	assert_eq!(format_time(9.99), "0:09");
	assert_eq!(format_time(65.0), "1:05");
	assert_eq!(format_time(600.4), "10:00");
	assert_eq!(format_time(-3.0), "0:00");
	assert_eq!(format_time(f64::NAN), "0:00");
	assert_eq!(format_time(f64::INFINITY), "0:00");
}

#[test]
fn test_snap_playback_rate() {
	assert_eq!(snap_playback_rate(1.4), 1.5);
	assert_eq!(snap_playback_rate(1.375), 1.25);
	assert_eq!(snap_playback_rate(0.625), 0.5);
	assert_eq!(snap_playback_rate(1.0), 1.0);
	assert_eq!(snap_playback_rate(0.0), 0.25);
	assert_eq!(snap_playback_rate(16.0), 2.0);
	assert_eq!(snap_playback_rate(f64::NAN), 1.0);
}

#[test]
fn test_clamping() {
	assert_eq!(clamp_unit(-1.0), 0.0);
	assert_eq!(clamp_unit(0.5), 0.5);
	assert_eq!(clamp_unit(2.0), 1.0);

	assert_eq!(clamp_time(4.0, 10.0), 4.0);
	assert_eq!(clamp_time(40.0, 10.0), 10.0);
	assert_eq!(clamp_time(-1.0, 10.0), 0.0);
	assert_eq!(clamp_time(4.0, f64::NAN), 0.0);
	assert_eq!(clamp_time(4.0, 0.0), 0.0);
}

#[test]
fn test_progress_percent() {
	assert_eq!(progress_percent(5.0, 20.0), 25.0);
	assert_eq!(progress_percent(25.0, 20.0), 100.0);
	assert_eq!(progress_percent(5.0, 0.0), 0.0);
	assert_eq!(progress_percent(5.0, f64::INFINITY), 0.0);
}

#[test]
fn test_contiguous_buffered_fraction() {
	let ranges = [TimeRange::new(5.0, 8.0), TimeRange::new(0.1, 2.0), TimeRange::new(2.0, 4.0)];
	assert_eq!(contiguous_buffered_fraction(&ranges, 10.0), 0.4);

	let gap = [TimeRange::new(3.0, 10.0)];
	assert_eq!(contiguous_buffered_fraction(&gap, 10.0), 0.0);

	let past_end = [TimeRange::new(0.0, 12.0)];
	assert_eq!(contiguous_buffered_fraction(&past_end, 10.0), 1.0);

	assert_eq!(contiguous_buffered_fraction(&[], 10.0), 0.0);
	assert_eq!(contiguous_buffered_fraction(&ranges, f64::NAN), 0.0);
}

#[test]
fn test_mailbox_delivers_nested_items_in_order() {
	let mailbox = Rc::new(Mailbox::default());
	let seen = Rc::new(RefCell::new(Vec::new()));

	fn handle(mailbox: &Rc<Mailbox<u32>>, seen: &Rc<RefCell<Vec<u32>>>, item: u32) {
		seen.borrow_mut().push(item);
		if item < 3 {
			mailbox.deliver(item * 10, |nested| handle(mailbox, seen, nested));
			mailbox.deliver(item * 10 + 1, |nested| handle(mailbox, seen, nested));
		}
	}

	mailbox.deliver(1, |item| handle(&mailbox, &seen, item));

	assert_eq!(*seen.borrow(), vec![1, 10, 11]);
}
