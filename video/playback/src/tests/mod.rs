mod mock;
mod util;
