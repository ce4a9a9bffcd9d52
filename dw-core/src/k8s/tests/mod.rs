
use dw_testutils::*;
use rstest::*;

use super::*;
