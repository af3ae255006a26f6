#[derive(Clone, Copy, Debug)]
pub struct All;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cpu(pub u32);

impl Cpu {
    pub const ALL: All = All;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Proc(pub u32);

impl Proc {
    pub const CURRENT: Proc = Proc(0);
}

/// The task and CPU a counter observes.
///
/// `pid == 0` means the calling thread, `cpu == -1` means any CPU.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Target {
    pub(crate) pid: i32,
    pub(crate) cpu: i32,
}

impl Target {
    /// The calling thread, on `cpu` if given, otherwise on any CPU.
    pub fn current(cpu: Option<Cpu>) -> Self {
        match cpu {
            Some(cpu) => (Proc::CURRENT, cpu).into(),
            None => (Proc::CURRENT, Cpu::ALL).into(),
        }
    }
}

impl Default for Target {
    fn default() -> Self {
        Self::current(None)
    }
}

macro_rules! into_target {
    ($ty: ty, $destruct: tt, $pid: expr, $cpu: expr) => {
        impl From<$ty> for Target {
            fn from($destruct: $ty) -> Self {
                Target {
                    pid: $pid as _,
                    cpu: $cpu as _,
                }
            }
        }
    };
}

into_target!((Proc, Cpu), (Proc(pid), Cpu(cpu)), pid, cpu);
into_target!((Cpu, Proc), (Cpu(cpu), Proc(pid)), pid, cpu);

into_target!((Proc, All), (Proc(pid), _), pid, -1);
into_target!((All, Proc), (_, Proc(pid)), pid, -1);

// Counting every task on every CPU is rejected by the kernel, so there
// is no `(All, All)` target.
