mod probability;
