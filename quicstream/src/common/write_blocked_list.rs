//! Streams with buffered data, waiting for the transport to accept writes.
//!
//! One FIFO per priority level. Levels are served strictly in priority
//! order, so a saturated urgent level starves the lower ones.

use std::collections::VecDeque;

use crate::protocol::QuicPriority;
use crate::protocol::HIGHEST_PRIORITY;
use crate::protocol::LOWEST_PRIORITY;

const LEVELS: usize = LOWEST_PRIORITY as usize + 1;

#[derive(Debug)]
pub struct WriteBlockedList<I> {
    lists: [VecDeque<I>; LEVELS],
}

impl<I> Default for WriteBlockedList<I> {
    fn default() -> Self {
        WriteBlockedList {
            lists: Default::default(),
        }
    }
}

impl<I: Copy + Eq> WriteBlockedList<I> {
    pub fn new() -> WriteBlockedList<I> {
        Default::default()
    }

    /// Clamp priority into the valid range.
    ///
    /// Out of range priority is a caller bug, it is logged, not returned.
    pub fn clamp_priority(priority: QuicPriority) -> QuicPriority {
        if priority > LOWEST_PRIORITY {
            error!("invalid priority: {}", priority);
            return LOWEST_PRIORITY;
        }
        priority
    }

    fn list(&self, priority: QuicPriority) -> &VecDeque<I> {
        &self.lists[WriteBlockedList::<I>::clamp_priority(priority) as usize]
    }

    fn list_mut(&mut self, priority: QuicPriority) -> &mut VecDeque<I> {
        &mut self.lists[WriteBlockedList::<I>::clamp_priority(priority) as usize]
    }

    /// Level of the most urgent non-empty list.
    ///
    /// # Panics
    ///
    /// If there are no blocked streams.
    pub fn get_highest_priority_write_blocked_list(&self) -> QuicPriority {
        match self.lists.iter().position(|l| !l.is_empty()) {
            Some(p) => p as QuicPriority,
            None => panic!("no write blocked streams"),
        }
    }

    /// # Panics
    ///
    /// If the list of the given priority is empty.
    pub fn pop_front(&mut self, priority: QuicPriority) -> I {
        match self.list_mut(priority).pop_front() {
            Some(id) => id,
            None => panic!("no write blocked streams at priority {}", priority),
        }
    }

    pub fn has_write_blocked_streams(&self) -> bool {
        self.lists.iter().any(|l| !l.is_empty())
    }

    /// Whether any stream more urgent than `priority` is blocked.
    pub fn has_write_blocked_streams_greater_than_priority(&self, priority: QuicPriority) -> bool {
        let priority = WriteBlockedList::<I>::clamp_priority(priority);
        (HIGHEST_PRIORITY..priority).any(|p| !self.list(p).is_empty())
    }

    /// Callers must not push a stream which is already blocked.
    pub fn push_back(&mut self, stream_id: I, priority: QuicPriority) {
        self.list_mut(priority).push_back(stream_id);
    }

    /// Remove the stream from the list of given priority, no-op if absent.
    pub fn remove_stream_from_write_blocked_list(&mut self, stream_id: I, priority: QuicPriority) {
        self.list_mut(priority).retain(|&id| id != stream_id);
    }

    pub fn num_blocked_streams(&self) -> usize {
        self.lists.iter().map(|l| l.len()).sum()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::thread_rng;
    use rand::Rng;

    type List = WriteBlockedList<u32>;

    #[test]
    fn priority_order() {
        let mut list = List::new();
        assert!(!list.has_write_blocked_streams());
        list.push_back(40, 7);
        list.push_back(23, 0);
        list.push_back(17, 3);

        assert_eq!(3, list.num_blocked_streams());
        assert!(list.has_write_blocked_streams_greater_than_priority(3));
        assert!(list.has_write_blocked_streams_greater_than_priority(1));
        assert!(!list.has_write_blocked_streams_greater_than_priority(0));

        assert_eq!(0, list.get_highest_priority_write_blocked_list());
        assert_eq!(23, list.pop_front(0));
        assert_eq!(3, list.get_highest_priority_write_blocked_list());
        assert_eq!(17, list.pop_front(3));
        assert_eq!(7, list.get_highest_priority_write_blocked_list());
        assert_eq!(40, list.pop_front(7));
        assert!(!list.has_write_blocked_streams());
        assert_eq!(0, list.num_blocked_streams());
    }

    #[test]
    fn fifo_within_level() {
        let mut list = List::new();
        list.push_back(1, 2);
        list.push_back(5, 2);
        list.push_back(3, 2);
        assert_eq!(1, list.pop_front(2));
        assert_eq!(5, list.pop_front(2));
        assert_eq!(3, list.pop_front(2));
    }

    #[test]
    fn clamp() {
        assert_eq!(7, List::clamp_priority(8));
        assert_eq!(7, List::clamp_priority(u32::MAX));
        assert_eq!(4, List::clamp_priority(4));

        let mut list = List::new();
        list.push_back(9, 100);
        assert_eq!(7, list.get_highest_priority_write_blocked_list());
        assert!(!list.has_write_blocked_streams_greater_than_priority(100));
        assert_eq!(9, list.pop_front(7));
    }

    #[test]
    fn remove_idempotent() {
        let mut list = List::new();
        list.push_back(1, 4);
        list.push_back(2, 4);
        list.push_back(3, 5);

        list.remove_stream_from_write_blocked_list(3, 4);
        list.remove_stream_from_write_blocked_list(7, 4);
        assert_eq!(3, list.num_blocked_streams());

        list.remove_stream_from_write_blocked_list(1, 4);
        list.remove_stream_from_write_blocked_list(1, 4);
        assert_eq!(2, list.num_blocked_streams());
        assert_eq!(2, list.pop_front(4));
        assert_eq!(3, list.pop_front(5));
    }

    #[test]
    #[should_panic]
    fn pop_empty_level() {
        let mut list = List::new();
        list.push_back(1, 4);
        list.pop_front(3);
    }

    #[test]
    #[should_panic]
    fn highest_of_empty() {
        List::new().get_highest_priority_write_blocked_list();
    }

    fn model_check_iter() {
        let mut list = List::new();
        let mut model: Vec<VecDeque<u32>> = vec![VecDeque::new(); LEVELS];

        for id in 0..100 {
            match thread_rng().gen_range(0, 3) {
                0 | 1 => {
                    let p = thread_rng().gen_range(0, LEVELS as u32);
                    list.push_back(id, p);
                    model[p as usize].push_back(id);
                }
                _ => {
                    let p = thread_rng().gen_range(0, LEVELS as u32);
                    let victim = thread_rng().gen_range(0, id + 1);
                    list.remove_stream_from_write_blocked_list(victim, p);
                    model[p as usize].retain(|&i| i != victim);
                }
            }
            assert_eq!(
                model.iter().map(|l| l.len()).sum::<usize>(),
                list.num_blocked_streams()
            );
        }

        // Pop everything: all of a level before anything of a lower one,
        // push order within a level.
        while list.has_write_blocked_streams() {
            let p = list.get_highest_priority_write_blocked_list();
            assert!(!list.has_write_blocked_streams_greater_than_priority(p));
            let expected = model[p as usize].pop_front().unwrap();
            assert!(model[..p as usize].iter().all(|l| l.is_empty()));
            assert_eq!(expected, list.pop_front(p));
        }
        assert!(model.iter().all(|l| l.is_empty()));
    }

    #[test]
    fn model_check() {
        for _ in 0..1000 {
            model_check_iter();
        }
    }
}
