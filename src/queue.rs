//! Command hand-over between the transport and the engine
//!
//! Property writes arrive on whatever context the transport runs in. They
//! are parsed on arrival and queued here; the controller drains the queue
//! on the engine's thread. Built on `critical-section` and `heapless::Deque`.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::command::Command;
use crate::parse::ParseError;

/// Error returned when the queue is full; carries the rejected command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError(pub Command);

/// Error returned when the queue is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryReceiveError;

/// Error returned by [`CommandSender::try_send_write`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    /// The write was malformed and is ignored
    Invalid(ParseError),
    /// The queue is full
    Full(Command),
}

impl From<ParseError> for SendError {
    fn from(error: ParseError) -> Self {
        Self::Invalid(error)
    }
}

impl From<TrySendError> for SendError {
    fn from(error: TrySendError) -> Self {
        Self::Full(error.0)
    }
}

/// Bounded, interrupt safe queue of parsed commands
pub struct CommandQueue<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<Command, SIZE>>>,
}

impl<const SIZE: usize> CommandQueue<SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Get a sender handle for the transport side
    pub const fn sender(&self) -> CommandSender<'_, SIZE> {
        CommandSender { queue: self }
    }

    /// Get a receiver handle for the engine side
    pub const fn receiver(&self) -> CommandReceiver<'_, SIZE> {
        CommandReceiver { queue: self }
    }

    fn try_send(&self, command: Command) -> Result<(), TrySendError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(command).map_err(TrySendError)
        })
    }

    fn try_receive(&self) -> Result<Command, TryReceiveError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.pop_front().ok_or(TryReceiveError)
        })
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for CommandQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending half of a [`CommandQueue`]
#[derive(Clone, Copy)]
pub struct CommandSender<'a, const SIZE: usize> {
    queue: &'a CommandQueue<SIZE>,
}

impl<const SIZE: usize> CommandSender<'_, SIZE> {
    /// Queue an already parsed command
    pub fn try_send(&self, command: Command) -> Result<(), TrySendError> {
        self.queue.try_send(command)
    }

    /// Parse a raw property write and queue it
    ///
    /// Malformed writes are rejected here and never reach the engine.
    pub fn try_send_write(&self, property: &str, value: &str) -> Result<(), SendError> {
        let command = Command::parse_write(property, value).inspect_err(|_error| {
            #[cfg(feature = "esp32-log")]
            println!("[CommandSender.try_send_write] ignoring {property}={value}: {_error}");
        })?;
        self.queue.try_send(command)?;
        Ok(())
    }
}

/// Receiving half of a [`CommandQueue`]
#[derive(Clone, Copy)]
pub struct CommandReceiver<'a, const SIZE: usize> {
    queue: &'a CommandQueue<SIZE>,
}

impl<const SIZE: usize> CommandReceiver<'_, SIZE> {
    /// Take the oldest queued command
    pub fn try_receive(&self) -> Result<Command, TryReceiveError> {
        self.queue.try_receive()
    }
}
