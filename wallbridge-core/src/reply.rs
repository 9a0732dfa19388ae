use std::sync::{mpsc, Arc, Mutex};

use crate::command::Response;

type ReplyFn = Box<dyn FnOnce(Response) + Send>;

/// Single-use reply channel for one in-flight call.
///
/// Clones share one underlying slot, so a handler can hand the responder to
/// a completion callback running on another thread. Whoever replies first
/// wins; later attempts are swallowed and logged, which enforces the
/// one-Response-per-call invariant.
#[derive(Clone)]
pub struct Responder {
    reply: Arc<Mutex<Option<ReplyFn>>>,
}

impl Responder {
    pub fn new(reply: impl FnOnce(Response) + Send + 'static) -> Self {
        Self {
            reply: Arc::new(Mutex::new(Some(Box::new(reply)))),
        }
    }

    /// Responder paired with a receiver, for shells that block on the reply.
    pub fn channel() -> (Self, mpsc::Receiver<Response>) {
        let (tx, rx) = mpsc::channel();
        let responder = Self::new(move |response| {
            let _ = tx.send(response);
        });
        (responder, rx)
    }

    /// Deliver the reply. Returns false if one was already delivered.
    pub fn respond(&self, response: Response) -> bool {
        let reply = {
            let mut slot = match self.reply.lock() {
                Ok(slot) => slot,
                Err(poisoned) => poisoned.into_inner(),
            };
            slot.take()
        };
        match reply {
            Some(reply) => {
                reply(response);
                true
            }
            None => {
                log::warn!("duplicate reply dropped");
                false
            }
        }
    }

    pub fn success_text(&self, message: &str) -> bool {
        self.respond(Response::success_text(message))
    }

    pub fn success_bytes(&self, bytes: Vec<u8>) -> bool {
        self.respond(Response::success_bytes(bytes))
    }

    pub fn error(&self, code: &str, message: &str) -> bool {
        self.respond(Response::error(code, message))
    }

    pub fn not_implemented(&self) -> bool {
        self.respond(Response::NotImplemented)
    }
}
