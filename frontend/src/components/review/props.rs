use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ReviewProps {
    /// Interval between promotion status polls.
    #[prop_or(1000)]
    pub poll_millis: u32,
}
