use crate::protocol::StreamId;
use std::collections::HashSet;
use std::collections::VecDeque;

/// Frames for a stream may keep arriving after the stream was closed and
/// removed. This struct remembers several recently closed streams so such
/// frames are dropped instead of opening a new stream.
#[derive(Default)]
pub struct ClosedStreams {
    set: HashSet<StreamId>,
    lru: VecDeque<StreamId>,
}

const MAX_SIZE: usize = 100;

impl ClosedStreams {
    pub fn new() -> ClosedStreams {
        Default::default()
    }

    pub fn contains(&self, stream_id: StreamId) -> bool {
        self.set.contains(&stream_id)
    }

    pub fn add(&mut self, stream_id: StreamId) {
        if self.set.insert(stream_id) {
            if self.lru.len() == MAX_SIZE {
                if let Some(remove) = self.lru.pop_front() {
                    self.set.remove(&remove);
                }
            }

            self.lru.push_back(stream_id);
        }
    }

    #[cfg(test)]
    pub fn self_check(&self) {
        assert_eq!(self.set.len(), self.lru.len());
        for stream_id in &self.lru {
            assert!(self.set.contains(stream_id));
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn evicts_oldest() {
        let mut closed_streams = ClosedStreams::new();

        for i in 1..=MAX_SIZE {
            closed_streams.add(i as StreamId);
            closed_streams.self_check();
        }

        for i in 1..=MAX_SIZE {
            assert!(closed_streams.contains(i as StreamId));
        }

        closed_streams.add(5);
        closed_streams.self_check();

        for i in 1..=MAX_SIZE {
            closed_streams.add((i + 10000) as StreamId);
            assert!(closed_streams.contains((i + 10000) as StreamId));
            assert!(!closed_streams.contains(i as StreamId));
            closed_streams.self_check();
        }
    }
}
