//! Lock free handoff of envelope values from an audio thread to an
//! analysis thread.

/// The audio thread side. Never blocks or allocates.
pub struct EnvelopeProducer {
    producer: rtrb::Producer<f32>,
    dropped_count: usize,
}

/// The analysis thread side.
pub struct EnvelopeConsumer {
    consumer: rtrb::Consumer<f32>,
}

/// Creates a single producer, single consumer envelope queue holding at most
/// `capacity` values.
pub fn envelope_channel(capacity: usize) -> (EnvelopeProducer, EnvelopeConsumer) {
    let (producer, consumer) = rtrb::RingBuffer::<f32>::new(capacity).split();
    (
        EnvelopeProducer {
            producer,
            dropped_count: 0,
        },
        EnvelopeConsumer { consumer },
    )
}

impl EnvelopeProducer {
    /// Enqueues an envelope value. Returns false, and drops the value, if the queue is full.
    pub fn push(&mut self, value: f32) -> bool {
        match self.producer.push(value) {
            Ok(()) => true,
            Err(_) => {
                self.dropped_count += 1;
                false
            }
        }
    }

    /// The number of values dropped because the consumer fell behind.
    pub fn dropped_count(&self) -> usize {
        self.dropped_count
    }
}

impl EnvelopeConsumer {
    pub fn pop(&mut self) -> Option<f32> {
        self.consumer.pop().ok()
    }

    /// Passes all currently queued values to `f`, oldest first.
    /// Returns the number of values drained.
    pub fn drain<F: FnMut(f32)>(&mut self, mut f: F) -> usize {
        let mut count = 0;
        while let Some(value) = self.pop() {
            f(value);
            count += 1;
        }
        count
    }
}
