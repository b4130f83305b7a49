use std::cell::RefCell;
use std::rc::Rc;

use crate::timer::Scheduler;

struct Typing<S: Scheduler> {
    chars: Vec<char>,
    speed_ms: u32,
    scheduler: S,
    write: Box<dyn Fn(&str)>,
    timer: RefCell<Option<S::Handle>>,
}

/// Types `text` out one character per `speed_ms`.
///
/// The first character is written immediately. Typing keeps going after the
/// handle is dropped; call [`TypeWriter::stop`] to cut it short.
pub struct TypeWriter<S: Scheduler> {
    typing: Rc<Typing<S>>,
}

pub fn type_writer<S, F>(text: &str, speed_ms: u32, scheduler: S, write: F) -> TypeWriter<S>
where
    S: Scheduler,
    F: Fn(&str) + 'static,
{
    let typing = Rc::new(Typing {
        chars: text.chars().collect(),
        speed_ms,
        scheduler,
        write: Box::new(write),
        timer: RefCell::new(None),
    });
    (typing.write)("");
    step(&typing, 0);
    TypeWriter { typing }
}

fn step<S: Scheduler>(typing: &Rc<Typing<S>>, next: usize) {
    if next >= typing.chars.len() {
        return;
    }
    let shown: String = typing.chars[..=next].iter().collect();
    (typing.write)(&shown);

    let t = typing.clone();
    let handle = typing
        .scheduler
        .schedule(typing.speed_ms, Box::new(move || step(&t, next + 1)));
    *typing.timer.borrow_mut() = Some(handle);
}

impl<S: Scheduler> TypeWriter<S> {
    pub fn stop(&self) {
        let pending = self.typing.timer.borrow_mut().take();
        drop(pending);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::manual::ManualScheduler;

    fn capture() -> (Rc<RefCell<String>>, impl Fn(&str) + 'static) {
        let out = Rc::new(RefCell::new(String::from("stale")));
        let sink = out.clone();
        (out, move |s: &str| *sink.borrow_mut() = s.to_string())
    }

    #[test]
    fn types_one_character_per_tick() {
        let clock = ManualScheduler::new();
        let (out, write) = capture();
        let _tw = type_writer("Hey", 100, clock.clone(), write);

        assert_eq!(*out.borrow(), "H");
        clock.advance(100);
        assert_eq!(*out.borrow(), "He");
        clock.advance(100);
        assert_eq!(*out.borrow(), "Hey");
        clock.advance(500);
        assert_eq!(*out.borrow(), "Hey");
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn empty_text_just_clears() {
        let clock = ManualScheduler::new();
        let (out, write) = capture();
        let _tw = type_writer("", 100, clock.clone(), write);
        assert_eq!(*out.borrow(), "");
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn dropped_handle_keeps_typing() {
        let clock = ManualScheduler::new();
        let (out, write) = capture();
        drop(type_writer("ok", 10, clock.clone(), write));
        clock.advance(10);
        assert_eq!(*out.borrow(), "ok");
    }

    #[test]
    fn stop_freezes_the_text() {
        let clock = ManualScheduler::new();
        let (out, write) = capture();
        let tw = type_writer("héllo", 50, clock.clone(), write);
        clock.advance(50);
        assert_eq!(*out.borrow(), "hé");
        tw.stop();
        clock.advance(1000);
        assert_eq!(*out.borrow(), "hé");
    }
}
