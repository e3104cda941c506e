//! What a walking search asks of its goal

pub trait Heuristic<T> {
    fn heuristic(&self, input: &T) -> f64;
}

pub trait GoalCheck<T> {
    fn is_goal(&self, input: &T) -> bool;
}
