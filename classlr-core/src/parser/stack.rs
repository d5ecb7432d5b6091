// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use crate::parser::{ParserError, SemanticHooks};
use crate::StateId;

/// State stack and semantic-value stack of one parse.
///
/// Both stacks always have the same length: each state is paired with the value of the
/// symbol that led to it. The bottom entry holds the initial state and a placeholder value.
///
/// The capacity starts at `initial_depth` and doubles each time it's exhausted, without
/// ever exceeding `max_depth`. Once at `max_depth`, [reserve_one](ParseStack::reserve_one)
/// fails with [ParserError::StackExhausted].
#[derive(Debug)]
pub struct ParseStack<V> {
    states: Vec<StateId>,
    values: Vec<V>,
    capacity: usize,
    max_depth: usize,
}

impl<V> ParseStack<V> {
    pub fn new(initial_depth: usize, max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        let capacity = initial_depth.clamp(1, max_depth);
        ParseStack {
            states: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            capacity,
            max_depth,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Current logical capacity, which only changes by doubling.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Makes room for one more entry, growing the stacks if necessary.
    pub fn reserve_one(&mut self) -> Result<(), ParserError> {
        let len = self.states.len();
        if len < self.capacity {
            return Ok(());
        }
        if self.capacity >= self.max_depth {
            return Err(ParserError::StackExhausted { limit: self.max_depth });
        }
        let new_capacity = (self.capacity * 2).min(self.max_depth);
        self.states.reserve_exact(new_capacity - len);
        self.values.reserve_exact(new_capacity - len);
        self.capacity = new_capacity;
        Ok(())
    }

    /// Pushes a state and its value. Room must have been made with [reserve_one](ParseStack::reserve_one)
    /// or by popping entries first.
    pub fn push(&mut self, state: StateId, value: V) {
        debug_assert!(self.states.len() < self.capacity, "push without reserved room");
        self.states.push(state);
        self.values.push(value);
    }

    pub fn pop(&mut self) -> Option<(StateId, V)> {
        let state = self.states.pop()?;
        let value = self.values.pop()?;
        Some((state, value))
    }

    /// Pops `n` entries and returns their values, oldest first.
    pub fn pop_values(&mut self, n: usize) -> Vec<V> {
        let at = self.states.len() - n;
        self.states.truncate(at);
        self.values.split_off(at)
    }

    /// State on top of the stack, if any.
    #[inline]
    pub fn top(&self) -> Option<StateId> {
        self.states.last().copied()
    }

    /// State on top of the stack. The stack is only empty during an error recovery that gives up.
    #[inline]
    pub fn top_state(&self) -> StateId {
        self.states[self.states.len() - 1]
    }

    pub fn states(&self) -> &[StateId] {
        &self.states
    }

    /// Empties the stacks, handing each value to the release hook, from the top down.
    pub fn release_all<H: SemanticHooks<Value = V>>(&mut self, hooks: &mut H) {
        self.states.clear();
        while let Some(value) = self.values.pop() {
            hooks.release(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_up_to_ceiling() {
        let mut stack = ParseStack::<u32>::new(2, 5);
        let mut capacities = vec![];
        for i in 0..5 {
            stack.reserve_one().expect("room");
            stack.push(i, i * 10);
            capacities.push(stack.capacity());
        }
        assert_eq!(capacities, vec![2, 2, 4, 4, 5]);
        assert_eq!(stack.reserve_one(), Err(ParserError::StackExhausted { limit: 5 }));
        assert_eq!(stack.len(), 5);
    }

    #[test]
    fn pop_values_oldest_first() {
        let mut stack = ParseStack::new(4, 10);
        for (s, v) in [(0, 'a'), (3, 'b'), (7, 'c'), (9, 'd')] {
            stack.reserve_one().expect("room");
            stack.push(s, v);
        }
        assert_eq!(stack.pop_values(3), vec!['b', 'c', 'd']);
        assert_eq!(stack.states(), &[0]);
        assert_eq!(stack.top(), Some(0));
        assert_eq!(stack.pop(), Some((0, 'a')));
        assert!(stack.is_empty());
        assert_eq!(stack.top(), None);
    }

    #[test]
    fn degenerate_limits() {
        let stack = ParseStack::<()>::new(0, 0);
        assert_eq!((stack.capacity(), stack.max_depth()), (1, 1));
        let stack = ParseStack::<()>::new(500, 100);
        assert_eq!(stack.capacity(), 100);
    }
}
