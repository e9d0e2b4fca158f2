#[macro_use]
extern crate bencher;

use bencher::{black_box, Bencher};
use benchplot::lock::{self, LockLog};
use benchplot::queue::{self, QueueLog};

const LOCKS: [&str; 5] = [
    "spin_lock_aligned",
    "spin_lock_aligned_paused",
    "spin_lock_ttas",
    "spin_lock_ttas_paused",
    "pthread_mutex",
];

/// A lock sweep over 1..=64 threads, laid out the way the benchmark prints it.
fn lock_log() -> String {
    let mut s = String::from("Thread mapping:\nThread 0 @ package 0, core 0\n\n");
    for t in 1..=64 {
        s.push_str(&format!("Nthreads={}\n==============\n", t));
        for (i, l) in LOCKS.iter().enumerate() {
            s.push_str(&format!(
                "\tnthreads:{} \tlock:{} \tcycles:{}.000000\n",
                t,
                l,
                t * 40 + i
            ));
        }
    }
    s
}

fn queue_log() -> String {
    let mut s = String::new();
    for q in &["stage_lam", "stage_ff"] {
        for size in &[10, 100, 1000, 10000, 100000] {
            for spin in &[0, 1, 10, 100, 1000] {
                s.push_str(&format!(
                    "Queue:{} queue_size:{} iters:1000000 nsecs_to_spin:{} cycles_to_spin:{} cycles_per_iter:{}.5 cycles_per_iter_wo_delay:{}.5\n",
                    q, size, spin, spin * 3, 60 + spin * 3, 60 + spin
                ));
            }
        }
    }
    s
}

fn lock_collect(b: &mut Bencher) {
    let text = lock_log();
    b.iter(|| LockLog::collect(black_box(text.as_bytes())).unwrap());
}

fn lock_pivot(b: &mut Bencher) {
    let log = LockLog::collect(lock_log().as_bytes()).unwrap();
    b.iter(|| log.pivot(lock::DEFAULT_METRIC));
}

fn queue_collect(b: &mut Bencher) {
    let text = queue_log();
    b.iter(|| QueueLog::collect(black_box(text.as_bytes())).unwrap());
}

fn queue_pivot(b: &mut Bencher) {
    let log = QueueLog::collect(queue_log().as_bytes()).unwrap();
    b.iter(|| log.pivot(queue::DEFAULT_METRIC));
}

benchmark_group!(benches, lock_collect, lock_pivot, queue_collect, queue_pivot);
benchmark_main!(benches);
