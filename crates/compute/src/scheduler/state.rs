use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use super::task::{SearchTask, TaskSpec};
use super::types::{Lane, Priority, TaskId, TaskState};

/// Heap entry: highest priority first, FIFO among equal priorities.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct ReadyTask {
    priority: Priority,
    seq: Reverse<u64>,
    id: TaskId,
}

struct Node {
    state: TaskState,
    lane: Lane,
    priority: Priority,
    /// Present until the task is handed to a worker.
    task: Option<Box<dyn SearchTask>>,
}

/// Live part of the task graph, owned by the dispatcher.
///
/// Finished tasks are dropped immediately; a dependency on a task that is no
/// longer live counts as satisfied.
#[derive(Default)]
pub(crate) struct TaskGraph {
    nodes: HashMap<TaskId, Node>,
    /// Remaining producer count per `Created` task.
    waiting: HashMap<TaskId, usize>,
    /// Consumers to notify when a producer completes.
    dependents: HashMap<TaskId, Vec<TaskId>>,
    ready: [BinaryHeap<ReadyTask>; 2],
    running: [usize; 2],
    seq: u64,
}

impl TaskGraph {
    pub(crate) fn insert(&mut self, spec: TaskSpec) {
        let TaskSpec { id, after, task } = spec;
        let lane = task.lane();
        let priority = task.priority();

        let mut pending = 0;
        for producer in after {
            if self.nodes.contains_key(&producer) {
                self.dependents.entry(producer).or_default().push(id);
                pending += 1;
            }
        }

        let state = if pending == 0 {
            TaskState::Ready
        } else {
            self.waiting.insert(id, pending);
            TaskState::Created
        };
        self.nodes.insert(
            id,
            Node {
                state,
                lane,
                priority,
                task: Some(task),
            },
        );
        if state == TaskState::Ready {
            self.enqueue(id, lane, priority);
        }
    }

    fn enqueue(&mut self, id: TaskId, lane: Lane, priority: Priority) {
        self.seq += 1;
        self.ready[lane.index()].push(ReadyTask {
            priority,
            seq: Reverse(self.seq),
            id,
        });
    }

    /// Take the best ready task of `lane` and mark it running.
    pub(crate) fn pop_ready(&mut self, lane: Lane) -> Option<(TaskId, Box<dyn SearchTask>)> {
        while let Some(entry) = self.ready[lane.index()].pop() {
            let Some(node) = self.nodes.get_mut(&entry.id) else {
                continue;
            };
            let Some(task) = node.task.take() else {
                continue;
            };
            node.state = TaskState::Running;
            self.running[lane.index()] += 1;
            return Some((entry.id, task));
        }
        None
    }

    /// Retire a running task. Completion releases its dependents; failure
    /// leaves them blocked, since the run is over anyway.
    pub(crate) fn finish(&mut self, id: TaskId, terminal: TaskState) {
        debug_assert!(terminal.is_terminal());
        let Some(node) = self.nodes.remove(&id) else {
            return;
        };
        if node.state == TaskState::Running {
            self.running[node.lane.index()] -= 1;
        }
        let dependents = self.dependents.remove(&id).unwrap_or_default();
        if terminal != TaskState::Completed {
            return;
        }
        for consumer in dependents {
            let Some(remaining) = self.waiting.get_mut(&consumer) else {
                continue;
            };
            *remaining -= 1;
            if *remaining > 0 {
                continue;
            }
            self.waiting.remove(&consumer);
            if let Some(node) = self.nodes.get_mut(&consumer) {
                node.state = TaskState::Ready;
                let (lane, priority) = (node.lane, node.priority);
                self.enqueue(consumer, lane, priority);
            }
        }
    }

    pub(crate) fn state(&self, id: TaskId) -> Option<TaskState> {
        self.nodes.get(&id).map(|n| n.state)
    }

    pub(crate) fn ready_len(&self, lane: Lane) -> usize {
        self.ready[lane.index()].len()
    }

    pub(crate) fn running_in(&self, lane: Lane) -> usize {
        self.running[lane.index()]
    }

    pub(crate) fn running(&self) -> usize {
        self.running.iter().sum()
    }

    pub(crate) fn blocked(&self) -> usize {
        self.waiting.len()
    }

    pub(crate) fn live(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::task::{IdAllocator, TaskContext, TaskError};
    use crate::scheduler::types::TaskOutcome;

    struct Stub {
        lane: Lane,
        priority: u32,
    }

    impl SearchTask for Stub {
        fn name(&self) -> &'static str { "stub" }
        fn lane(&self) -> Lane { self.lane }
        fn priority(&self) -> Priority { Priority(self.priority) }
        fn execute(&self, _ctx: &mut TaskContext) -> Result<TaskOutcome, TaskError> {
            Ok(TaskOutcome::Completed)
        }
    }

    fn spec(ids: &IdAllocator, lane: Lane, priority: u32, after: &[TaskId]) -> TaskSpec {
        TaskSpec {
            id: ids.next(),
            after: after.to_vec(),
            task: Box::new(Stub { lane, priority }),
        }
    }

    #[test]
    fn ready_tasks_pop_by_priority_then_fifo() {
        let ids = IdAllocator::default();
        let mut graph = TaskGraph::default();
        let specs = [
            spec(&ids, Lane::Compute, 1, &[]),
            spec(&ids, Lane::Compute, 5, &[]),
            spec(&ids, Lane::Compute, 5, &[]),
            spec(&ids, Lane::Compute, 3, &[]),
        ];
        let order: Vec<TaskId> = specs.iter().map(|s| s.id).collect();
        for s in specs {
            graph.insert(s);
        }

        let popped: Vec<TaskId> =
            std::iter::from_fn(|| graph.pop_ready(Lane::Compute).map(|(id, _)| id)).collect();
        assert_eq!(popped, vec![order[1], order[2], order[3], order[0]]);
        assert_eq!(graph.running_in(Lane::Compute), 4);
        assert!(graph.pop_ready(Lane::Control).is_none());
    }

    #[test]
    fn lanes_have_separate_queues() {
        let ids = IdAllocator::default();
        let mut graph = TaskGraph::default();
        graph.insert(spec(&ids, Lane::Control, 0, &[]));
        graph.insert(spec(&ids, Lane::Compute, 9, &[]));
        assert_eq!(graph.ready_len(Lane::Control), 1);
        assert_eq!(graph.ready_len(Lane::Compute), 1);
    }

    #[test]
    fn dependent_waits_for_producer() {
        let ids = IdAllocator::default();
        let mut graph = TaskGraph::default();
        let producer = spec(&ids, Lane::Compute, 0, &[]);
        let producer_id = producer.id;
        graph.insert(producer);
        let consumer = spec(&ids, Lane::Control, 0, &[producer_id]);
        let consumer_id = consumer.id;
        graph.insert(consumer);

        assert_eq!(graph.state(consumer_id), Some(TaskState::Created));
        assert_eq!(graph.blocked(), 1);
        assert!(graph.pop_ready(Lane::Control).is_none());

        let (id, _) = graph.pop_ready(Lane::Compute).unwrap();
        assert_eq!(graph.state(id), Some(TaskState::Running));
        graph.finish(id, TaskState::Completed);

        assert_eq!(graph.state(producer_id), None);
        assert_eq!(graph.state(consumer_id), Some(TaskState::Ready));
        assert_eq!(graph.blocked(), 0);
        assert_eq!(graph.pop_ready(Lane::Control).map(|(id, _)| id), Some(consumer_id));
    }

    #[test]
    fn consumer_with_two_producers_needs_both() {
        let ids = IdAllocator::default();
        let mut graph = TaskGraph::default();
        let a = spec(&ids, Lane::Compute, 0, &[]);
        let b = spec(&ids, Lane::Compute, 0, &[]);
        let (a_id, b_id) = (a.id, b.id);
        graph.insert(a);
        graph.insert(b);
        let c = spec(&ids, Lane::Control, 0, &[a_id, b_id]);
        let c_id = c.id;
        graph.insert(c);

        graph.pop_ready(Lane::Compute);
        graph.pop_ready(Lane::Compute);
        graph.finish(a_id, TaskState::Completed);
        assert_eq!(graph.state(c_id), Some(TaskState::Created));
        graph.finish(b_id, TaskState::Completed);
        assert_eq!(graph.state(c_id), Some(TaskState::Ready));
    }

    #[test]
    fn finished_producer_counts_as_satisfied() {
        let ids = IdAllocator::default();
        let mut graph = TaskGraph::default();
        let producer = spec(&ids, Lane::Compute, 0, &[]);
        let producer_id = producer.id;
        graph.insert(producer);
        graph.pop_ready(Lane::Compute);
        graph.finish(producer_id, TaskState::Completed);

        let late = spec(&ids, Lane::Control, 0, &[producer_id]);
        let late_id = late.id;
        graph.insert(late);
        assert_eq!(graph.state(late_id), Some(TaskState::Ready));
    }

    #[test]
    fn failed_producer_keeps_dependents_blocked() {
        let ids = IdAllocator::default();
        let mut graph = TaskGraph::default();
        let producer = spec(&ids, Lane::Compute, 0, &[]);
        let producer_id = producer.id;
        graph.insert(producer);
        graph.insert(spec(&ids, Lane::Control, 0, &[producer_id]));

        graph.pop_ready(Lane::Compute);
        graph.finish(producer_id, TaskState::Failed);
        assert_eq!(graph.running(), 0);
        assert_eq!(graph.blocked(), 1);
        assert_eq!(graph.live(), 1);
        assert!(!graph.is_empty());
    }
}
