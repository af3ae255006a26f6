use std::mem::size_of;

use super::Opts;
use crate::event::Event;
use crate::ffi::Attr;

pub(crate) fn from(event: Event, opts: &Opts) -> Attr {
    let mut attr = Attr {
        size: size_of::<Attr>() as _,
        ..Default::default()
    };

    // event config:

    attr.type_ = event.kind.as_type();
    attr.config = event.selector;

    // count config:

    macro_rules! when {
        ($bool:ident, $then:tt) => {
            if opts.exclude.$bool {
                attr.$then(1);
            }
        };
    }
    when!(user, set_exclude_user);
    when!(kernel, set_exclude_kernel);
    when!(hv, set_exclude_hv);

    attr.read_format = opts.stat_format.as_read_format();

    // Counters stay stopped until the group is explicitly enabled. Members of
    // a group are started together with their leader by `PERF_IOC_FLAG_GROUP`.
    attr.set_disabled(1);

    attr
}
