//! The router under concurrent registration, dispatch, and completion

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use switchback_foundation::{RecordingSender, SenderHandle};
use switchback_parser::names;
use switchback_router::{
    CommandSpec, DispatchOutcome, ParamSpec, PrimaryQueue, Router, ThreadWorkers,
};

const REGISTRARS: usize = 8;
const COMMANDS_PER_REGISTRAR: usize = 25;
const DISPATCHERS: usize = 6;
const DISPATCHES_PER_THREAD: usize = 200;

fn counting(counter: &Arc<AtomicUsize>, name: String) -> CommandSpec {
    let counter = Arc::clone(counter);
    CommandSpec::new(name, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
}

#[test]
fn registrations_and_dispatches_interleave() {
    let router = Arc::new(Router::default());
    let invoked = Arc::new(AtomicUsize::new(0));
    router
        .register(
            counting(&invoked, "ping".into())
                .path("ping <?>")
                .param(ParamSpec::new(names::INT).filter("min:0")),
        )
        .unwrap();

    let registrars: Vec<_> = (0..REGISTRARS)
        .map(|r| {
            let router = Arc::clone(&router);
            let invoked = Arc::clone(&invoked);
            thread::spawn(move || {
                for c in 0..COMMANDS_PER_REGISTRAR {
                    router
                        .register(counting(&invoked, format!("cmd_{r}_{c}")).path(format!("plugin{r} run{c}")))
                        .unwrap();
                }
            })
        })
        .collect();

    let handled = Arc::new(AtomicUsize::new(0));
    let dispatchers: Vec<_> = (0..DISPATCHERS)
        .map(|d| {
            let router = Arc::clone(&router);
            let handled = Arc::clone(&handled);
            thread::spawn(move || {
                let sender: SenderHandle = Arc::new(RecordingSender::console());
                for i in 0..DISPATCHES_PER_THREAD {
                    let outcome = router.dispatch(&sender, "ping", &[(d * i).to_string()]);
                    if outcome.is_handled() {
                        handled.fetch_add(1, Ordering::SeqCst);
                    }
                    // Commands being registered may or may not be visible yet.
                    let label = format!("plugin{}", i % REGISTRARS);
                    let outcome = router.dispatch(&sender, &label, &[format!("run{}", i % COMMANDS_PER_REGISTRAR)]);
                    assert!(matches!(
                        outcome,
                        DispatchOutcome::Handled(_) | DispatchOutcome::UnknownCommand | DispatchOutcome::Rejected(_)
                    ));
                    if outcome.is_handled() {
                        handled.fetch_add(1, Ordering::SeqCst);
                    }
                }
            })
        })
        .collect();

    for handle in registrars.into_iter().chain(dispatchers) {
        handle.join().unwrap();
    }

    assert_eq!(router.labels().len(), REGISTRARS + 1);
    assert_eq!(router.all_commands().len(), REGISTRARS * COMMANDS_PER_REGISTRAR + 1);
    assert_eq!(
        router.node_count(),
        REGISTRARS * (COMMANDS_PER_REGISTRAR + 1) + 2
    );
    assert_eq!(invoked.load(Ordering::SeqCst), handled.load(Ordering::SeqCst));

    let sender: SenderHandle = Arc::new(RecordingSender::console());
    for r in 0..REGISTRARS {
        for c in 0..COMMANDS_PER_REGISTRAR {
            let label = format!("plugin{r}");
            assert!(router.dispatch(&sender, &label, &[format!("run{c}")]).is_handled());
        }
    }
}

#[test]
fn churn_on_one_path_leaves_a_consistent_tree() {
    let router = Arc::new(Router::default());
    let workers: Vec<_> = (0..4)
        .map(|w| {
            let router = Arc::clone(&router);
            thread::spawn(move || {
                let sender: SenderHandle = Arc::new(RecordingSender::console());
                for i in 0..100 {
                    let id = router
                        .register(CommandSpec::new(format!("warp_{w}_{i}"), |_| Ok(())).path("warp home"))
                        .unwrap();
                    router.dispatch(&sender, "warp", &["home"]);
                    // Another thread may have replaced this registration already.
                    let _ = router.unregister(id);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let sender = RecordingSender::console();
    match router.resolve(&sender, "warp", &["home"]).resolved() {
        Some(_) => assert_eq!(router.node_count(), 2),
        None => assert_eq!(router.node_count(), 0),
    }
}

#[test]
fn async_dispatch_matches_on_workers_and_runs_on_the_queue() {
    let queue = Arc::new(PrimaryQueue::new());
    let workers = Arc::new(ThreadWorkers::new());
    let router = Arc::new(
        Router::default()
            .with_primary_executor(queue.clone())
            .with_worker_pool(workers.clone()),
    );
    let invoked = Arc::new(AtomicUsize::new(0));
    router
        .register(
            counting(&invoked, "say".into())
                .path("say <?>")
                .param(ParamSpec::new(names::STRING).greedy()),
        )
        .unwrap();

    let sender: SenderHandle = Arc::new(RecordingSender::console());
    let receivers: Vec<_> = (0..32)
        .map(|i| {
            router.dispatch_async(
                Arc::clone(&sender),
                "say".to_string(),
                vec!["hello".to_string(), i.to_string()],
            )
        })
        .collect();
    for receiver in receivers {
        assert!(receiver.recv().unwrap().is_handled());
    }

    assert_eq!(workers.submitted(), 32);
    assert_eq!(invoked.load(Ordering::SeqCst), 0);
    assert_eq!(queue.run_pending(), 32);
    assert_eq!(invoked.load(Ordering::SeqCst), 32);
}

#[test]
fn completion_while_registering() {
    let router = Arc::new(Router::default());
    router.register(CommandSpec::new("base", |_| Ok(())).path("set base")).unwrap();

    let registrar = {
        let router = Arc::clone(&router);
        thread::spawn(move || {
            for i in 0..100 {
                router
                    .register(CommandSpec::new(format!("s{i}"), |_| Ok(())).path(format!("set b{i}")))
                    .unwrap();
            }
        })
    };
    let completer = {
        let router = Arc::clone(&router);
        thread::spawn(move || {
            let sender = RecordingSender::console();
            for _ in 0..200 {
                let found = router.complete(&sender, "set", &["ba"]);
                assert_eq!(found, vec!["base"]);
            }
        })
    };
    registrar.join().unwrap();
    completer.join().unwrap();

    let sender = RecordingSender::console();
    assert_eq!(router.complete(&sender, "set", &["b"]).len(), 101);
}
