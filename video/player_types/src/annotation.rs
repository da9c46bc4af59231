/// A labelled time interval over a video.
///
/// `payload` is display metadata owned by the caller and never inspected here.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationWindow<P = ()> {
	pub id: String,
	pub time_in: f64,
	pub time_out: f64,
	pub payload: P,
}

impl AnnotationWindow<()> {
	pub fn new(id: impl Into<String>, time_in: f64, time_out: f64) -> Self {
		Self::with_payload(id, time_in, time_out, ())
	}
}

impl<P> AnnotationWindow<P> {
	pub fn with_payload(id: impl Into<String>, time_in: f64, time_out: f64, payload: P) -> Self {
		Self {
			id: id.into(),
			time_in,
			time_out,
			payload,
		}
	}

	/// Closed interval test, both bounds are inclusive.
	pub fn contains(&self, time: f64) -> bool {
		self.time_in <= time && time <= self.time_out
	}

	pub fn length(&self) -> f64 {
		self.time_out - self.time_in
	}
}
