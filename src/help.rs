use std::fmt::Write;

use crate::{name_to_token, Parser};

macro_rules! w {
    ($($tt:tt)*) => {
        {
            let _ = write!($($tt)*);
        }
    };
}

impl Parser<'_> {
    /// Renders the usage banner and every flag with its doc line, in registration order.
    ///
    /// ```text
    /// Usage: prog [options]
    ///
    /// Flags:
    ///   --help, -h  Print this help page
    ///   --jobs, -j  Number of workers
    /// ```
    pub fn help(&self) -> String {
        let mut buf = String::new();
        w!(buf, "Usage: {}\n\nFlags:\n", self.usage());

        let declarations = self
            .flags()
            .map(|flag| flag.names().iter().map(|name| name_to_token(name)).collect::<Vec<_>>())
            .map(|tokens| tokens.join(", "))
            .collect::<Vec<_>>();
        let align = declarations.iter().map(|decl| decl.chars().count()).max().unwrap_or(0);

        for (decl, flag) in declarations.iter().zip(self.flags()) {
            w!(buf, "  {decl:<align$}  {}\n", flag.doc());
        }

        buf
    }
}
