use crate::space::Space;
use crate::space::State;

/// A single-start, single-goal search problem over a `Space`.
pub trait ObjectiveProblem<Sp, St>: std::fmt::Debug + Sized
where
    Sp: Space<St>,
    St: State,
{
    fn space(&self) -> &Sp;
    fn start(&self) -> St;
    fn goal(&self) -> St;
}
