//! Behaviour of the three-task mailbox application
//!
//! Scenarios drive the tasks either through the kernel on a simulated clock
//! or step by step with a hand-built context when a test needs to control
//! the interleaving exactly.

#[cfg(test)]
mod support {
    use core::fmt;

    use mailbox_rtos::app::{Console, Event, RandomSource, TaskTag};

    /// Console keeping every line as structured data
    #[derive(Default)]
    pub struct Recorder {
        pub lines: Vec<(TaskTag, Event)>,
    }

    impl Console for Recorder {
        fn write_line(&mut self, tag: TaskTag, event: Event) -> fmt::Result {
            self.lines.push((tag, event));
            Ok(())
        }
    }

    impl Recorder {
        pub fn of(&self, tag: TaskTag) -> Vec<Event> {
            self.lines
                .iter()
                .filter(|(t, _)| *t == tag)
                .map(|(_, e)| *e)
                .collect()
        }

        /// Counters of the records the Detector reported as changes
        pub fn observed_counts(&self) -> Vec<u32> {
            self.of(TaskTag::T1)
                .into_iter()
                .filter_map(|e| match e {
                    Event::Count(count) => Some(count),
                    _ => None,
                })
                .collect()
        }

        pub fn received(&self) -> Vec<i32> {
            self.of(TaskTag::T3)
                .into_iter()
                .filter_map(|e| match e {
                    Event::Received(value) => Some(value),
                    _ => None,
                })
                .collect()
        }
    }

    /// Writer that rejects every write
    pub struct Unplugged;

    impl fmt::Write for Unplugged {
        fn write_str(&mut self, _s: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    /// Replays a fixed list of raw random numbers, cycling
    pub struct Script {
        values: Vec<u32>,
        next: usize,
    }

    impl Script {
        pub fn new(values: &[u32]) -> Self {
            Script { values: values.to_vec(), next: 0 }
        }
    }

    impl RandomSource for Script {
        fn next_random(&mut self) -> u32 {
            let value = self.values[self.next % self.values.len()];
            self.next += 1;
            value
        }
    }

    /// Change seen by the Detector, rebuilt from its console lines
    #[derive(Debug, Default)]
    pub struct Change {
        pub count: u32,
        pub random: i32,
        pub ratio: f32,
        pub sent: u32,
    }

    pub fn changes(recorder: &Recorder) -> Vec<Change> {
        let mut out: Vec<Change> = Vec::new();
        for event in recorder.of(TaskTag::T1) {
            match event {
                Event::ChangeReceived => out.push(Change::default()),
                Event::Count(count) => out.last_mut().unwrap().count = count,
                Event::Random(random) => out.last_mut().unwrap().random = random,
                Event::Division(ratio) => out.last_mut().unwrap().ratio = ratio,
                Event::RandomSent => out.last_mut().unwrap().sent += 1,
                other => panic!("unexpected detector line {:?}", other),
            }
        }
        out
    }
}

#[cfg(test)]
mod scenario_tests {
    use core::fmt::Write;

    use super::support::{changes, Recorder, Unplugged};
    use mailbox_rtos::app::{
        self, Console, Detector, Drain, Event, Lcg, Producer, Record, SerialConsole, System,
        TaskTag, Variant,
    };
    use mailbox_rtos::{Kernel, OsError, OsTaskState, CFG_RANDOM_SEED, PRIO_DETECTOR, PRIO_DRAIN};

    #[test]
    fn test_change_with_count_6_forwards_once() {
        let mut detector = Detector::polling();
        let mut drain = Drain::new();

        let mut kernel = Kernel::new(System::new(Recorder::default()));
        kernel.task_create("Task 1", PRIO_DETECTOR, &mut detector).unwrap();
        kernel.task_create("Task 3", PRIO_DRAIN, &mut drain).unwrap();

        kernel.env().mailbox.overwrite(Record::new(6, 42));
        kernel.run_until_idle();

        assert_eq!(
            kernel.env().console.lines,
            vec![
                (TaskTag::T1, Event::ChangeReceived),
                (TaskTag::T1, Event::Count(6)),
                (TaskTag::T1, Event::Random(42)),
                (TaskTag::T1, Event::Division(7.0)),
                (TaskTag::T1, Event::RandomSent),
                (TaskTag::T3, Event::Received(42)),
            ]
        );
        assert!(kernel.env().ints.is_empty());
        assert_eq!(kernel.task_state(PRIO_DETECTOR), Some(OsTaskState::Delayed));
        assert_eq!(kernel.task_state(PRIO_DRAIN), Some(OsTaskState::Pend));
    }

    #[test]
    fn test_change_with_count_5_forwards_nothing() {
        let mut detector = Detector::polling();
        let mut drain = Drain::new();

        let mut kernel = Kernel::new(System::new(Recorder::default()));
        kernel.task_create("Task 1", PRIO_DETECTOR, &mut detector).unwrap();
        kernel.task_create("Task 3", PRIO_DRAIN, &mut drain).unwrap();

        let record = Record::new(5, 7);
        assert_eq!(record.ratio, 1.4);
        kernel.env().mailbox.overwrite(record);
        kernel.run_until_idle();

        let console = &kernel.env().console;
        assert_eq!(
            console.of(TaskTag::T1),
            vec![
                Event::ChangeReceived,
                Event::Count(5),
                Event::Random(7),
                Event::Division(1.4),
            ]
        );
        assert!(console.of(TaskTag::T3).is_empty());
        drop(kernel);
        assert_eq!(drain.received(), 0);
    }

    #[test]
    fn test_identical_records_are_ignored() {
        let mut detector = Detector::polling().with_poll_interval(10);
        let mut drain = Drain::new();

        let mut kernel = Kernel::new(System::new(Recorder::default()));
        kernel.task_create("Task 1", PRIO_DETECTOR, &mut detector).unwrap();
        kernel.task_create("Task 3", PRIO_DRAIN, &mut drain).unwrap();

        kernel.env().mailbox.overwrite(Record::new(3, 9));
        kernel.run_until_idle();
        let after_first = kernel.env().console.lines.len();
        assert_eq!(after_first, 4 + 3 + 3);

        // Republish an equal record and poll several more times
        kernel.env().mailbox.overwrite(Record::new(3, 9));
        kernel.advance(50);

        assert_eq!(kernel.env().console.lines.len(), after_first);
        assert!(kernel.env().ints.is_empty());
        drop(kernel);
        assert_eq!(detector.changes(), 1);
    }

    #[test]
    fn test_serial_console_prints_exact_lines() {
        let mut detector = Detector::polling();
        let mut drain = Drain::new();

        let mut kernel = Kernel::new(System::new(SerialConsole::new(String::new())));
        kernel.task_create("Task 1", PRIO_DETECTOR, &mut detector).unwrap();
        kernel.task_create("Task 3", PRIO_DRAIN, &mut drain).unwrap();

        kernel.env().mailbox.overwrite(Record::new(6, 42));
        kernel.run_until_idle();

        assert_eq!(
            kernel.env().console.get_ref(),
            "T1>> Change received from mailboxQueue\r\n\
             T1>> count: 6\r\n\
             T1>> random: 42\r\n\
             T1>> division: 7.00\r\n\
             T1>> random value sent to intsQueue\r\n\
             T3>> Received from intsQueue: 42\r\n"
        );
    }

    #[test]
    fn test_failed_console_write_does_not_stop_tasks() {
        let mut console = SerialConsole::new(Unplugged);
        assert!(Unplugged.write_str("x").is_err());
        assert_eq!(
            console.write_line(TaskTag::T2, Event::DataSent),
            Err(core::fmt::Error)
        );

        let mut detector = Detector::polling();
        let mut drain = Drain::new();

        let mut kernel = Kernel::new(System::new(console));
        kernel.task_create("Task 1", PRIO_DETECTOR, &mut detector).unwrap();
        kernel.task_create("Task 3", PRIO_DRAIN, &mut drain).unwrap();

        kernel.env().mailbox.overwrite(Record::new(7, 3));
        kernel.run_until_idle();

        assert!(kernel.env().ints.is_empty());
        drop(kernel);
        assert_eq!(detector.changes(), 1);
        assert_eq!(drain.received(), 2);
    }

    #[test]
    fn test_full_run_keeps_invariants() {
        let mut detector = Detector::polling();
        let mut producer = Producer::new(Lcg::new(CFG_RANDOM_SEED), Variant::Polling);
        let mut drain = Drain::new();

        let mut kernel = Kernel::new(System::new(Recorder::default()));
        app::create_tasks(&mut kernel, &mut detector, &mut producer, &mut drain).unwrap();
        kernel.run_until_idle();
        kernel.advance(60_000 + 100);

        let console = &kernel.env().console;
        let seen = changes(console);

        // 5 s period over 60 s, plus one poll to see the last publish
        assert_eq!(seen.len(), 12);
        assert_eq!(console.of(TaskTag::T2).len(), 12);

        for pair in seen.windows(2) {
            assert!(pair[0].count <= pair[1].count);
        }
        for change in &seen {
            assert_ne!(change.count, 0);
            assert!((change.ratio - change.random as f32 / change.count as f32).abs() < 1e-6);
            assert_eq!(change.sent, change.count % 5);
        }

        let expected: Vec<i32> = seen
            .iter()
            .flat_map(|c| std::iter::repeat(c.random).take(c.sent as usize))
            .collect();
        assert_eq!(console.received(), expected);
    }

    #[test]
    fn test_create_tasks_rejects_second_set() {
        let mut detector = Detector::polling();
        let mut producer = Producer::new(Lcg::new(1), Variant::Polling);
        let mut drain = Drain::new();
        let mut detector2 = Detector::polling();
        let mut producer2 = Producer::new(Lcg::new(1), Variant::Polling);
        let mut drain2 = Drain::new();

        let mut kernel = Kernel::new(System::new(Recorder::default()));
        app::create_tasks(&mut kernel, &mut detector, &mut producer, &mut drain).unwrap();
        assert_eq!(
            app::create_tasks(&mut kernel, &mut detector2, &mut producer2, &mut drain2),
            Err(OsError::PrioExist)
        );
    }
}

#[cfg(test)]
mod producer_tests {
    use super::support::{Recorder, Script};
    use mailbox_rtos::app::{Event, Lcg, Producer, RandomSource, Record, System, TaskTag, Variant};
    use mailbox_rtos::{Kernel, OsError, CFG_RANDOM_MAX, PRIO_PRODUCER};

    #[test]
    fn test_publishes_after_one_period() {
        let mut producer = Producer::new(Script::new(&[42]), Variant::Polling).with_period(20);

        let mut kernel = Kernel::new(System::new(Recorder::default()));
        kernel.task_create("Task 2", PRIO_PRODUCER, &mut producer).unwrap();

        kernel.run_until_idle();
        kernel.advance(19);
        assert!(kernel.env().mailbox.is_empty());

        kernel.advance(1);
        assert_eq!(kernel.env().mailbox.peek(), Ok(Record::new(1, 42)));
        assert_eq!(
            kernel.env().console.lines,
            vec![(TaskTag::T2, Event::DataSent)]
        );

        kernel.advance(20);
        assert_eq!(kernel.env().mailbox.peek(), Ok(Record::new(2, 42)));
        drop(kernel);
        assert_eq!(producer.count(), 3);
    }

    #[test]
    fn test_zero_period_publishes_once_per_tick() {
        let mut producer = Producer::new(Script::new(&[9]), Variant::Polling).with_period(0);

        let mut kernel = Kernel::new(System::new(Recorder::default()));
        kernel.task_create("Task 2", PRIO_PRODUCER, &mut producer).unwrap();

        // Goes idle instead of publishing forever within tick 0
        let mut steps = 0;
        while kernel.run_once() {
            steps += 1;
            assert!(steps < 100, "producer never went idle");
        }
        assert!(kernel.env().mailbox.is_empty());

        kernel.advance(3);
        assert_eq!(kernel.env().console.of(TaskTag::T2).len(), 3);
        drop(kernel);
        assert_eq!(producer.count(), 4);
    }

    #[test]
    fn test_draws_in_range() {
        let mut sys = System::new(Recorder::default());
        let mut producer = Producer::new(Script::new(&[250, 100, 101, 0]), Variant::Polling);

        let randoms: Vec<i32> = (0..4).map(|_| producer.publish(&mut sys).random).collect();
        assert_eq!(randoms, vec![250 % 101, 100, 0, 0]);

        let mut producer = Producer::new(Lcg::new(7), Variant::Polling);
        for _ in 0..200 {
            let record = producer.publish(&mut sys);
            assert!((0..=CFG_RANDOM_MAX as i32).contains(&record.random));
            assert_eq!(record.ratio, record.random as f32 / record.count as f32);
        }
    }

    #[test]
    fn test_signals_rendezvous_once_per_publish() {
        let mut sys = System::new(Recorder::default());
        let mut producer = Producer::new(Script::new(&[1]), Variant::Rendezvous);

        producer.publish(&mut sys);
        assert!(sys.rendezvous.is_set());
        assert_eq!(sys.rendezvous.try_pend(), Ok(()));

        // Two publishes without a take leave a single pending signal
        producer.publish(&mut sys);
        producer.publish(&mut sys);
        assert_eq!(sys.rendezvous.try_pend(), Ok(()));
        assert_eq!(sys.rendezvous.try_pend(), Err(OsError::PendWouldBlock));

        let mut polling = Producer::new(Script::new(&[1]), Variant::Polling);
        polling.publish(&mut sys);
        assert!(!sys.rendezvous.is_set());
    }

    #[test]
    fn test_lcg_is_deterministic() {
        let mut a = Lcg::new(1);
        let mut b = Lcg::new(1);
        let mut c = Lcg::new(2);

        let seq_a: Vec<u32> = (0..16).map(|_| a.next_random()).collect();
        let seq_b: Vec<u32> = (0..16).map(|_| b.next_random()).collect();
        let seq_c: Vec<u32> = (0..16).map(|_| c.next_random()).collect();

        assert_eq!(seq_a, seq_b);
        assert_ne!(seq_a, seq_c);
        assert!(seq_a.iter().all(|&v| v <= 0x7fff_ffff));
    }
}

#[cfg(test)]
mod detector_tests {
    use super::support::{Recorder, Script};
    use mailbox_rtos::app::{
        self, wait, Detector, Drain, Event, Lcg, Producer, Record, System, TaskTag, Variant,
    };
    use mailbox_rtos::task::{Ctx, Step, Task};
    use mailbox_rtos::{Kernel, OsTaskState, PRIO_DETECTOR};

    #[test]
    fn test_blocks_on_empty_mailbox() {
        let mut sys = System::new(Recorder::default());
        let mut detector = Detector::polling();

        let step = detector.run(&mut Ctx::new(&mut sys, 0));
        assert_eq!(step, Step::Pend(wait::MAILBOX_DATA));

        sys.mailbox.overwrite(Record::new(1, 10));
        let step = detector.run(&mut Ctx::new(&mut sys, 1));
        assert_eq!(step, Step::Delay(100));
        assert_eq!(detector.last_seen(), Record::new(1, 10));
    }

    #[test]
    fn test_zero_poll_interval_sleeps_one_tick() {
        let mut detector = Detector::polling().with_poll_interval(0);

        let mut kernel = Kernel::new(System::new(Recorder::default()));
        kernel.task_create("Task 1", PRIO_DETECTOR, &mut detector).unwrap();
        kernel.env().mailbox.overwrite(Record::new(5, 1));

        let mut steps = 0;
        while kernel.run_once() {
            steps += 1;
            assert!(steps < 100, "detector never went idle");
        }
        assert_eq!(steps, 1);
        assert_eq!(kernel.task_state(PRIO_DETECTOR), Some(OsTaskState::Delayed));

        // One unchanged poll per tick
        kernel.advance(4);
        assert_eq!(kernel.tcb(PRIO_DETECTOR).map(|tcb| tcb.run_ctr), Some(5));
    }

    #[test]
    fn test_blocks_on_full_queue_without_dropping() {
        let mut sys = System::new(Recorder::default());
        let mut detector = Detector::polling();

        for filler in 0..4 {
            sys.ints.try_send(filler).unwrap();
        }
        sys.mailbox.overwrite(Record::new(4, 77));

        let step = detector.run(&mut Ctx::new(&mut sys, 0));
        assert_eq!(step, Step::Pend(wait::INTS_SPACE));
        assert!(detector.is_forwarding());
        assert!(!sys.console.of(TaskTag::T1).contains(&Event::RandomSent));

        // Still full: retrying keeps it parked
        let step = detector.run(&mut Ctx::new(&mut sys, 1));
        assert_eq!(step, Step::Pend(wait::INTS_SPACE));

        let mut forwarded = Vec::new();
        while detector.is_forwarding() {
            forwarded.push(sys.ints.try_receive().unwrap());
            detector.run(&mut Ctx::new(&mut sys, 2));
        }
        forwarded.extend(core::iter::from_fn(|| sys.ints.try_receive().ok()));

        assert_eq!(forwarded, vec![0, 1, 2, 3, 77, 77, 77, 77]);
        let sent = sys
            .console
            .of(TaskTag::T1)
            .into_iter()
            .filter(|e| *e == Event::RandomSent)
            .count();
        assert_eq!(sent, 4);
    }

    #[test]
    fn test_polling_misses_update_between_polls() {
        // Two publishes land before the Detector's next poll
        let mut sys = System::new(Recorder::default());
        let mut producer = Producer::new(Script::new(&[10, 20, 30]), Variant::Polling);
        let mut detector = Detector::polling();

        producer.publish(&mut sys);
        detector.run(&mut Ctx::new(&mut sys, 0));
        while detector.is_forwarding() {
            sys.ints.try_receive().unwrap();
            detector.run(&mut Ctx::new(&mut sys, 0));
        }

        producer.publish(&mut sys);
        let missed = sys.mailbox.overwrite(Record::new(producer.count(), 30));
        assert_eq!(missed, Some(Record::new(2, 20)));

        detector.run(&mut Ctx::new(&mut sys, 100));
        assert_eq!(sys.console.observed_counts(), vec![1, 3]);
        assert_eq!(detector.last_seen(), Record::new(3, 30));
    }

    #[test]
    fn test_polling_race_under_kernel_schedule() {
        // Producer faster than the poll interval: two publishes per poll
        let mut detector = Detector::polling().with_poll_interval(100);
        let mut producer = Producer::new(Lcg::new(3), Variant::Polling).with_period(50);
        let mut drain = Drain::new();

        let mut kernel = Kernel::new(System::new(Recorder::default()));
        app::create_tasks(&mut kernel, &mut detector, &mut producer, &mut drain).unwrap();
        kernel.run_until_idle();
        kernel.advance(50 * 10);

        let observed = kernel.env().console.observed_counts();
        assert_eq!(&observed[..3], &[1, 2, 4]);
        assert!(observed.windows(2).all(|w| w[0] < w[1]));
        assert!(!observed.contains(&3));
    }
}

#[cfg(test)]
mod rendezvous_tests {
    use super::support::{changes, Recorder, Script};
    use mailbox_rtos::app::{
        self, wait, Detector, Drain, Lcg, Producer, Record, SerialConsole, System, Variant,
    };
    use mailbox_rtos::task::{Ctx, Step, Task};
    use mailbox_rtos::Kernel;

    #[test]
    fn test_observes_every_publish() {
        let mut detector = Detector::rendezvous();
        let mut producer = Producer::new(Lcg::new(11), Variant::Rendezvous).with_period(50);
        let mut drain = Drain::new();

        let mut kernel = Kernel::new(System::new(Recorder::default()));
        app::create_tasks(&mut kernel, &mut detector, &mut producer, &mut drain).unwrap();
        kernel.run_until_idle();
        kernel.advance(50 * 20);

        let console = &kernel.env().console;
        assert_eq!(console.observed_counts(), (1..=20).collect::<Vec<u32>>());

        let expected: Vec<i32> = changes(console)
            .iter()
            .flat_map(|c| std::iter::repeat(c.random).take((c.count % 5) as usize))
            .collect();
        assert_eq!(console.received(), expected);

        drop(kernel);
        assert_eq!(detector.last_seen().count, 20);
        assert_eq!(drain.received() as usize, expected.len());
    }

    #[test]
    fn test_serial_output_rounds_division() {
        let mut detector = Detector::rendezvous();
        let mut producer = Producer::new(Script::new(&[4]), Variant::Rendezvous).with_period(10);
        let mut drain = Drain::new();

        let mut kernel = Kernel::new(System::new(SerialConsole::new(String::new())));
        app::create_tasks(&mut kernel, &mut detector, &mut producer, &mut drain).unwrap();
        kernel.run_until_idle();
        kernel.advance(30);

        let text = kernel.env().console.get_ref();
        assert!(text.contains("T1>> division: 4.00\r\n"));
        assert!(text.contains("T1>> division: 2.00\r\n"));
        assert!(text.contains("T1>> division: 1.33\r\n"));
        assert_eq!(text.matches("T2>> Data sent to mailboxQueue\r\n").count(), 3);
    }

    #[test]
    fn test_collapses_unconsumed_posts() {
        let mut sys = System::new(Recorder::default());
        let mut producer = Producer::new(Script::new(&[5, 6, 7]), Variant::Rendezvous);
        let mut detector = Detector::rendezvous();

        assert_eq!(
            detector.run(&mut Ctx::new(&mut sys, 0)),
            Step::Pend(wait::RENDEZVOUS)
        );

        // Detector falls behind by three publishes
        for _ in 0..3 {
            producer.publish(&mut sys);
        }

        // count 3 forwards three times, one send per step
        let mut steps = 0;
        loop {
            steps += 1;
            match detector.run(&mut Ctx::new(&mut sys, 1)) {
                Step::Pend(flags) => {
                    assert_eq!(flags, wait::RENDEZVOUS);
                    break;
                }
                Step::Yield => {}
                other => panic!("unexpected step {:?}", other),
            }
        }

        assert_eq!(steps, 4);
        assert_eq!(sys.console.observed_counts(), vec![3]);
        assert_eq!(detector.last_seen(), Record::new(3, 7));
        assert_eq!(sys.ints.len(), 3);
    }
}
