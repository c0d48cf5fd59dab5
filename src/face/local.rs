use alloc::{collections::VecDeque, rc::Rc};
use core::cell::RefCell;

use crate::{
    face::{DataSender, FaceError},
    packet::Data,
};

// An in-process face: whatever the sender half is given is queued
//  for the receiver half, up to a fixed number of packets.

pub struct LocalSender {
    inner: Rc<RefCell<LocalQueue>>,
}
pub struct LocalReceiver {
    inner: Rc<RefCell<LocalQueue>>,
}

struct LocalQueue {
    packets: VecDeque<Rc<Data>>,
    capacity: usize,
}

pub fn local_face(capacity: usize) -> (LocalSender, LocalReceiver) {
    let inner = Rc::new(RefCell::new(LocalQueue {
        packets: VecDeque::with_capacity(capacity),
        capacity,
    }));

    let sender = LocalSender {
        inner: Rc::clone(&inner),
    };
    let receiver = LocalReceiver { inner };

    (sender, receiver)
}

impl DataSender for LocalSender {
    fn send_data(&mut self, data: &Rc<Data>) -> Result<(), FaceError> {
        if Rc::strong_count(&self.inner) <= 1 {
            return Err(FaceError::Disconnected);
        }

        let mut queue = self.inner.borrow_mut();
        if queue.packets.len() >= queue.capacity {
            return Err(FaceError::Full);
        }
        queue.packets.push_back(Rc::clone(data));
        Ok(())
    }
}

impl LocalReceiver {
    pub fn try_recv(&mut self) -> Option<Rc<Data>> {
        self.inner.borrow_mut().packets.pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Whether the sender half is still around
    pub fn is_connected(&self) -> bool {
        Rc::strong_count(&self.inner) > 1
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;

    use crate::{
        face::{DataSender, FaceError},
        name::Name,
        packet::Data,
    };

    #[test]
    fn test_local() {
        let (mut sender, mut receiver) = super::local_face(2);
        let data = Rc::new(Data::new(Name::from_uri("/local/1").unwrap(), b"payload"));

        assert!(receiver.try_recv().is_none());
        assert!(receiver.is_connected());

        assert_eq!(sender.send_data(&data), Ok(()));
        assert_eq!(sender.send_data(&data), Ok(()));
        assert_eq!(sender.send_data(&data), Err(FaceError::Full));
        assert_eq!(receiver.len(), 2);

        assert_eq!(receiver.try_recv().as_deref(), Some(&*data));
        assert_eq!(sender.send_data(&data), Ok(()));
        assert_eq!(receiver.len(), 2);

        drop(receiver);
        assert_eq!(sender.send_data(&data), Err(FaceError::Disconnected));
    }

    #[test]
    fn test_sender_dropped() {
        let (sender, mut receiver) = super::local_face(1);
        drop(sender);
        assert!(!receiver.is_connected());
        assert!(receiver.try_recv().is_none());
    }
}
